pub mod entities;
pub mod errors;
pub mod notify;
pub mod value_objects;

pub use entities::{BillRecord, Order};
pub use errors::{DomainError, DomainResult};
pub use notify::NotifyPayload;
pub use value_objects::{Money, OrderStatus};
