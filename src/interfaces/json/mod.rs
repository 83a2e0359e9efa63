pub mod promptpay;
