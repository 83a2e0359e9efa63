//! Domain layer: the PromptPay encoder, the product and sale model, and the
//! storage ports the application layer depends on.

pub mod money;
pub mod ports;
pub mod product;
pub mod promptpay;
pub mod sale;
