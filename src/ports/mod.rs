pub mod bill_ledger_port;
pub mod order_store_port;
pub mod payment_gateway_port;

pub use bill_ledger_port::BillLedgerPort;
pub use order_store_port::OrderStorePort;
pub use payment_gateway_port::{GatewayMethod, GatewayRequest, GatewayResponse, PaymentGatewayPort};
