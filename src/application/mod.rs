pub mod dto;
pub mod payment_gateway_adapter;

pub use dto::{AppPayResponse, ErrorResponse, NotifyOutcome, PaymentResult, QrCodeResult};
pub use payment_gateway_adapter::PaymentGatewayAdapter;
