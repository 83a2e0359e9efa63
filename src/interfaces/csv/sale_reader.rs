use crate::domain::sale::{SaleDraft, SaleLine};
use crate::error::{PosError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct SaleRecord {
    sale: String,
    product: u32,
    quantity: u32,
}

/// A sale as read from CSV: the caller's reference plus the validated draft.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleBatch {
    pub reference: String,
    pub draft: SaleDraft,
}

/// Reads multi-item sales from a CSV source.
///
/// Expected header: `sale,product,quantity`. Consecutive rows sharing the same
/// `sale` reference form one sale. A row that fails to deserialize is reported
/// on its own and does not split the surrounding group.
pub struct SaleReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SaleReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily groups rows into sales.
    pub fn sales(self) -> impl Iterator<Item = Result<SaleBatch>> {
        SaleGroups {
            rows: self.reader.into_deserialize::<SaleRecord>(),
            current: None,
        }
    }
}

struct SaleGroups<I> {
    rows: I,
    current: Option<(String, Vec<SaleLine>)>,
}

fn finish((reference, lines): (String, Vec<SaleLine>)) -> Result<SaleBatch> {
    let draft = SaleDraft::new(lines).map_err(|e| {
        PosError::ValidationError(format!("sale {}: {}", reference, e))
    })?;
    Ok(SaleBatch { reference, draft })
}

impl<I> Iterator for SaleGroups<I>
where
    I: Iterator<Item = std::result::Result<SaleRecord, csv::Error>>,
{
    type Item = Result<SaleBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.rows.next() {
                Some(Ok(record)) => {
                    let line = SaleLine {
                        product_id: record.product,
                        quantity: record.quantity,
                    };
                    let same_sale =
                        matches!(&self.current, Some((reference, _)) if *reference == record.sale);
                    if same_sale {
                        if let Some((_, lines)) = self.current.as_mut() {
                            lines.push(line);
                        }
                    } else if let Some(done) = self.current.replace((record.sale, vec![line])) {
                        return Some(finish(done));
                    }
                }
                Some(Err(e)) => return Some(Err(PosError::from(e))),
                None => return self.current.take().map(finish),
            }
        }
    }
}
