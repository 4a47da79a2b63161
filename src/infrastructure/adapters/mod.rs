pub mod mysql_bill_ledger;
pub mod mysql_order_store;

pub use mysql_bill_ledger::MySqlBillLedger;
pub use mysql_order_store::MySqlOrderStore;
