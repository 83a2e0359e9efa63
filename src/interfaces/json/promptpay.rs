//! JSON request/response handling for PromptPay payload generation.
//!
//! Request body: `{"amount": 59.5}` (number or string; missing means zero).
//! Response body: `{"payload": "000201..."}`.
//!
//! A JSON number is a binary float, so `1.015` is really `1.01499999...` and
//! is charged as `1.01`. A string amount is read as exact decimal text.

use crate::application::pos::PosService;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PromptPayRequest {
    #[serde(default, deserialize_with = "amount_from_json")]
    pub amount: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonAmount {
    Number(f64),
    Text(String),
}

fn amount_from_json<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonAmount::deserialize(deserializer)? {
        JsonAmount::Number(n) => Decimal::from_f64_retain(n)
            .ok_or_else(|| D::Error::custom(format!("amount {} is out of range", n))),
        JsonAmount::Text(text) => text.trim().parse::<Decimal>().map_err(D::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayResponse {
    pub payload: String,
}

pub fn respond(service: &PosService, request: PromptPayRequest) -> Result<PromptPayResponse> {
    let payload = service.promptpay_payload(request.amount)?;
    Ok(PromptPayResponse {
        payload: payload.into_string(),
    })
}

/// Parses a JSON request body and returns the JSON response body.
pub fn handle(service: &PosService, body: &str) -> Result<String> {
    let request: PromptPayRequest = serde_json::from_str(body)?;
    let response = respond(service, request)?;
    Ok(serde_json::to_string(&response)?)
}
