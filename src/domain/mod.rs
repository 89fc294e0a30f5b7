pub mod category;
pub mod common;
pub mod transaction;

pub use category::Category;
pub use common::Identifiable;
pub use transaction::{Transaction, TransactionKind};
