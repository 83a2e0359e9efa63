//! Point-of-sale backend: product and sale management with atomic stock
//! deduction, plus PromptPay QR payload generation.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
