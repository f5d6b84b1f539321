pub mod quote;
pub mod readiness;
pub mod trade;
