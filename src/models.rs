//! Data models for ledger entries.
//!
//! This module contains the persisted [`Transaction`] record, the raw
//! [`NewTransaction`] input it is validated from, the identifier newtype
//! and the enumeration types for constrained values.

mod enums;
mod ids;
mod transaction;

pub use chrono::NaiveDate;
pub use enums::{Category, Field, ParseEnumError, Theme, TransactionType};
pub use ids::{IdGenerator, TransactionId};
pub use rust_decimal::Decimal;
pub use transaction::{MAX_AMOUNT, NewTransaction, Transaction};
