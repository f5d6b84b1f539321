pub mod encode;
pub mod quotes;
