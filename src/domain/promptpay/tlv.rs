use crate::error::{PosError, Result};

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A single EMVCo data object: two-digit tag plus its value.
///
/// The length prefix is never stored; it is derived from the value when the
/// field is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub value: String,
}

impl Field {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Appends `tag || len || value` to `out`.
    pub fn encode_into(&self, out: &mut String) -> Result<()> {
        check_tag(&self.tag)?;
        if !self.value.is_ascii() {
            return Err(PosError::MalformedPayload(format!(
                "field {} value is not ASCII",
                self.tag
            )));
        }
        if self.value.len() > MAX_VALUE_LEN {
            return Err(PosError::FieldTooLong {
                tag: self.tag.clone(),
                len: self.value.len(),
            });
        }
        out.push_str(&self.tag);
        out.push_str(&format!("{:02}", self.value.len()));
        out.push_str(&self.value);
        Ok(())
    }
}

/// Ordered list of fields, serialized in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push(Field::new(tag, value));
        self
    }

    /// Serializes `inner` and stores it as the value of `tag`.
    pub fn push_nested(&mut self, tag: impl Into<String>, inner: &FieldList) -> Result<&mut Self> {
        let value = inner.serialize()?;
        Ok(self.push(tag, value))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn serialize(&self) -> Result<String> {
        let mut out = String::new();
        for field in &self.fields {
            field.encode_into(&mut out)?;
        }
        Ok(out)
    }
}

fn check_tag(tag: &str) -> Result<()> {
    if tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(PosError::MalformedPayload(format!(
            "tag {:?} is not two digits",
            tag
        )))
    }
}

/// Splits a serialized field sequence back into fields, checking every declared length.
pub fn parse(input: &str) -> Result<Vec<Field>> {
    if !input.is_ascii() {
        return Err(PosError::MalformedPayload(
            "payload is not ASCII".to_string(),
        ));
    }

    let mut fields = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(PosError::MalformedPayload(format!(
                "truncated field header {:?}",
                rest
            )));
        }
        let (tag, tail) = rest.split_at(2);
        check_tag(tag)?;
        let (len, tail) = tail.split_at(2);
        let len: usize = len
            .parse()
            .ok()
            .filter(|_| len.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                PosError::MalformedPayload(format!("field {} has length {:?}", tag, len))
            })?;
        if tail.len() < len {
            return Err(PosError::MalformedPayload(format!(
                "field {} declares {} characters but only {} remain",
                tag,
                len,
                tail.len()
            )));
        }
        let (value, tail) = tail.split_at(len);
        fields.push(Field::new(tag, value));
        rest = tail;
    }
    Ok(fields)
}
