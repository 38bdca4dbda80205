//! Error types for the expense ledger.

use crate::models::Field;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, LedgerError>;

/// All errors that can occur when using the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Input for a new transaction was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),
}

/// Reason a new transaction was rejected.
///
/// Rules are checked in a fixed order (description, amount, date,
/// category) and only the first failing one is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Description is empty after trimming.
    #[error("Please enter a description")]
    EmptyDescription,
    /// Amount is not a number, not greater than zero, or above
    /// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT).
    #[error("Please enter a valid amount greater than 0")]
    InvalidAmount,
    /// No date was given.
    #[error("Please select a date")]
    MissingDate,
    /// Date is present but is not a `YYYY-MM-DD` calendar date.
    #[error("Please select a valid date")]
    InvalidDate,
    /// No category was selected.
    #[error("Please select a category")]
    MissingCategory,
    /// Category label is not one of the known categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

impl ValidationError {
    /// Returns the input field this error refers to.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> Field {
        match *self {
            Self::EmptyDescription => Field::Description,
            Self::InvalidAmount => Field::Amount,
            Self::MissingDate | Self::InvalidDate => Field::Date,
            Self::MissingCategory | Self::UnknownCategory(_) => Field::Category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = LedgerError::from(serde_err);
        assert!(matches!(err, LedgerError::Serialization(_)));
        let msg = err.to_string();
        assert!(msg.contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = LedgerError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn validation_error_is_transparent() {
        let err = LedgerError::from(ValidationError::EmptyDescription);
        assert_eq!(err.to_string(), "Please enter a description");
    }

    #[test]
    fn validation_error_fields() {
        assert_eq!(ValidationError::EmptyDescription.field(), Field::Description);
        assert_eq!(ValidationError::InvalidAmount.field(), Field::Amount);
        assert_eq!(ValidationError::InvalidDate.field(), Field::Date);
        assert_eq!(
            ValidationError::UnknownCategory("Pets".to_owned()).field(),
            Field::Category
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LedgerError>();
    }
}
