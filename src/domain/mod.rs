pub mod amount_serde;
pub mod transaction;

pub use transaction::{
    ParseEnumError, RequestContext, Transaction, TransactionStatus, TransactionType,
};
