//! PromptPay QR payloads: EMVCo merchant-presented TLV text with a CRC-16 trailer.

pub mod crc;
pub mod payload;
pub mod tlv;

pub use payload::{
    Payload, PayloadEncoder, PointOfInitiation, PromptPayProfile, decode, generate_payload,
};
