//! Application layer orchestrating the point-of-sale use cases.
//!
//! This module defines the `PosService` which is the entry point for product
//! management, sale settlement and PromptPay payload generation. Storage is
//! reached only through the ports in `domain::ports`.

pub mod pos;
