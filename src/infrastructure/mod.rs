pub mod adapters;
pub mod config;
pub mod qr_code;

pub use adapters::{MySqlBillLedger, MySqlOrderStore};
pub use config::AlipayConfig;
