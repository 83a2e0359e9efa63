use super::crc;
use super::tlv::{self, Field, FieldList};
use crate::error::{PosError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level and merchant-account tags used by the PromptPay profile.
pub mod tags {
    pub const PAYLOAD_FORMAT_INDICATOR: &str = "00";
    pub const POINT_OF_INITIATION: &str = "01";
    pub const MERCHANT_ACCOUNT: &str = "30";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const CRC: &str = "63";

    pub const MERCHANT_GUID: &str = "00";
    pub const MERCHANT_PHONE: &str = "01";
}

const PAYLOAD_FORMAT: &str = "01";
const CRC_HEADER: &str = "6304";
const IDENTIFIER_WIDTH: usize = 13;
const MAX_AMOUNT_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointOfInitiation {
    /// `"11"`: reusable QR. Emitted even when an amount is present.
    #[default]
    Static,
    /// `"12"`: single-use QR.
    Dynamic,
}

impl PointOfInitiation {
    pub fn code(&self) -> &'static str {
        match self {
            PointOfInitiation::Static => "11",
            PointOfInitiation::Dynamic => "12",
        }
    }
}

/// The constants that make a payload a PromptPay payload.
///
/// `Default` is the Thai Baht PromptPay profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptPayProfile {
    pub guid: String,
    pub dialing_code: String,
    pub currency: String,
    pub country: String,
    pub initiation: PointOfInitiation,
}

impl Default for PromptPayProfile {
    fn default() -> Self {
        Self {
            guid: "A000000677010111".to_string(),
            dialing_code: "66".to_string(),
            currency: "764".to_string(),
            country: "TH".to_string(),
            initiation: PointOfInitiation::Static,
        }
    }
}

impl PromptPayProfile {
    pub fn validate(&self) -> Result<()> {
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if self.guid.is_empty()
            || self.guid.len() > 32
            || !self.guid.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(PosError::ConfigError(format!(
                "guid {:?} must be 1-32 alphanumeric characters",
                self.guid
            )));
        }
        if !digits(&self.dialing_code) || self.dialing_code.len() > 3 {
            return Err(PosError::ConfigError(format!(
                "dialing code {:?} must be 1-3 digits",
                self.dialing_code
            )));
        }
        if !digits(&self.currency) || self.currency.len() != 3 {
            return Err(PosError::ConfigError(format!(
                "currency {:?} must be a 3-digit ISO 4217 code",
                self.currency
            )));
        }
        if self.country.len() != 2 || !self.country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(PosError::ConfigError(format!(
                "country {:?} must be a 2-letter ISO 3166 code",
                self.country
            )));
        }
        Ok(())
    }

    /// Rewrites a local mobile number into the fixed-width international form.
    ///
    /// A leading `0` is replaced by the dialing code and the result is
    /// left-padded with zeros to 13 characters.
    pub fn normalize_identifier(&self, identifier: &str) -> Result<String> {
        if !(10..=IDENTIFIER_WIDTH).contains(&identifier.len())
            || !identifier.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PosError::InvalidIdentifier(format!(
                "{:?} is not a 10-13 digit number",
                identifier
            )));
        }

        let international = match identifier.strip_prefix('0') {
            Some(rest) => format!("{}{}", self.dialing_code, rest),
            None => identifier.to_string(),
        };
        if international.len() > IDENTIFIER_WIDTH {
            return Err(PosError::InvalidIdentifier(format!(
                "{:?} normalizes to {} digits",
                identifier,
                international.len()
            )));
        }

        Ok(format!("{:0>width$}", international, width = IDENTIFIER_WIDTH))
    }
}

/// Formats a transaction amount for tag `54`.
///
/// Returns `None` for zero, which means the field is left out.
pub fn format_amount(amount: Decimal) -> Result<Option<String>> {
    if amount < Decimal::ZERO {
        return Err(PosError::InvalidAmount(format!(
            "{} is negative",
            amount
        )));
    }
    if amount.is_zero() {
        return Ok(None);
    }

    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    let text = rounded.to_string();
    if text.len() > MAX_AMOUNT_LEN {
        return Err(PosError::InvalidAmount(format!(
            "{} exceeds {} characters",
            text, MAX_AMOUNT_LEN
        )));
    }
    Ok(Some(text))
}

/// A checksummed PromptPay payload, ready to be rendered as a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    /// Validates `text` as a payload: trailing CRC first, then field structure.
    pub fn parse(text: &str) -> Result<Self> {
        decode(text)?;
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The four hex digits of the trailer.
    pub fn checksum(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }

    pub fn fields(&self) -> Result<Vec<Field>> {
        decode(&self.0)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks the CRC trailer of `text` and returns its top-level fields,
/// the CRC field included.
pub fn decode(text: &str) -> Result<Vec<Field>> {
    if !text.is_ascii() || text.len() < CRC_HEADER.len() + 4 {
        return Err(PosError::MalformedPayload(
            "too short to carry a checksum".to_string(),
        ));
    }
    let (body, declared) = text.split_at(text.len() - 4);
    if !body.ends_with(CRC_HEADER) {
        return Err(PosError::MalformedPayload(format!(
            "expected checksum header {} before the trailer",
            CRC_HEADER
        )));
    }
    let declared_value = u16::from_str_radix(declared, 16)
        .ok()
        .filter(|_| declared.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| {
            PosError::MalformedPayload(format!("checksum {:?} is not hexadecimal", declared))
        })?;

    let computed = crc::checksum(body.as_bytes());
    if computed != declared_value {
        return Err(PosError::ChecksumMismatch {
            declared: declared.to_uppercase(),
            computed: crc::to_hex(computed),
        });
    }

    let fields = tlv::parse(text)?;
    match fields.last() {
        Some(last) if last.tag == tags::CRC && last.value.len() == 4 => Ok(fields),
        _ => Err(PosError::MalformedPayload(
            "checksum is not the last field".to_string(),
        )),
    }
}

/// Builds PromptPay payloads for one profile.
///
/// Holds no mutable state, so a single encoder can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct PayloadEncoder {
    profile: PromptPayProfile,
}

impl PayloadEncoder {
    pub fn new(profile: PromptPayProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    pub fn profile(&self) -> &PromptPayProfile {
        &self.profile
    }

    /// Lays out the fields that precede the checksum, in payload order.
    pub fn fields(&self, identifier: &str, amount: Decimal) -> Result<FieldList> {
        let phone = self.profile.normalize_identifier(identifier)?;
        let amount = format_amount(amount)?;

        let mut merchant = FieldList::new();
        merchant
            .push(tags::MERCHANT_GUID, self.profile.guid.as_str())
            .push(tags::MERCHANT_PHONE, phone);

        let mut fields = FieldList::new();
        fields
            .push(tags::PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT)
            .push(tags::POINT_OF_INITIATION, self.profile.initiation.code())
            .push_nested(tags::MERCHANT_ACCOUNT, &merchant)?
            .push(tags::CURRENCY, self.profile.currency.as_str());
        if let Some(amount) = amount {
            fields.push(tags::AMOUNT, amount);
        }
        fields.push(tags::COUNTRY, self.profile.country.as_str());
        Ok(fields)
    }

    pub fn encode(&self, identifier: &str, amount: Decimal) -> Result<Payload> {
        let mut text = self.fields(identifier, amount)?.serialize()?;
        text.push_str(CRC_HEADER);
        let crc = crc::checksum(text.as_bytes());
        text.push_str(&crc::to_hex(crc));
        Ok(Payload(text))
    }
}

/// Encodes with the default Thai PromptPay profile.
pub fn generate_payload(identifier: &str, amount: Decimal) -> Result<Payload> {
    PayloadEncoder::default().encode(identifier, amount)
}
