//! Transaction model and new-transaction input.

use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, TransactionId, TransactionType};
use crate::error::ValidationError;

/// Format accepted for transaction dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decimal places kept for amounts.
const AMOUNT_SCALE: u32 = 2;

/// Largest amount a single transaction may carry (10^13).
///
/// Amounts are persisted as JSON numbers, so every accepted value must
/// survive an `f64` round trip to the cent. It also keeps ledger sums far
/// from the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x4E72_A000, 0x918, 0, false, 0);

/// A recorded income or expense entry.
///
/// Transactions are immutable once created; the ledger only ever adds or
/// removes whole entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Trimmed, non-empty description.
    pub description: String,
    /// Positive amount with at most two decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Calendar date of the entry (yyyy-MM-dd).
    pub date: NaiveDate,
    /// Direction of the entry.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Category label.
    pub category: Category,
    /// Optional free-text note; empty when absent.
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// Returns the amount signed by direction: positive for income,
    /// negative for expense.
    #[inline]
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Raw, unvalidated input for a new transaction, as entered in a form.
///
/// `date` defaults to today's local date when `None`; an explicitly empty
/// string is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTransaction {
    /// Description text.
    pub description: String,
    /// Amount text, e.g. `"12.50"`.
    pub amount: String,
    /// Date text in `YYYY-MM-DD` form, or `None` for today.
    pub date: Option<String>,
    /// Direction of the entry.
    pub kind: TransactionType,
    /// Category label; must name one of [`Category::ALL`].
    pub category: String,
    /// Optional note.
    pub note: String,
}

/// Validated fields of a new transaction, awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Draft {
    /// Trimmed description.
    description: String,
    /// Rounded positive amount.
    amount: Decimal,
    /// Resolved date.
    date: NaiveDate,
    /// Direction.
    kind: TransactionType,
    /// Parsed category.
    category: Category,
    /// Trimmed note.
    note: String,
}

impl Draft {
    /// Assigns an identifier, producing the final transaction.
    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            kind: self.kind,
            category: self.category,
            note: self.note,
        }
    }
}

impl NewTransaction {
    /// Validates the input, resolving a missing date to `today`.
    ///
    /// Rules run in order (description, amount, date, category); the
    /// first one to fail is returned.
    pub(crate) fn validate(&self, today: NaiveDate) -> Result<Draft, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_parse| ValidationError::InvalidAmount)?
            .round_dp(AMOUNT_SCALE);
        if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(ValidationError::InvalidAmount);
        }

        let date = match self.date.as_deref().map(str::trim) {
            None => today,
            Some("") => return Err(ValidationError::MissingDate),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map_err(|_parse| ValidationError::InvalidDate)?,
        };

        let label = self.category.trim();
        if label.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let category = Category::from_str(label)
            .map_err(|_parse| ValidationError::UnknownCategory(label.to_owned()))?;

        Ok(Draft {
            description: description.to_owned(),
            amount,
            date,
            kind: self.kind,
            category,
            note: self.note.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn input(description: &str, amount: &str, date: Option<&str>, category: &str) -> NewTransaction {
        NewTransaction {
            description: description.to_owned(),
            amount: amount.to_owned(),
            date: date.map(ToOwned::to_owned),
            kind: TransactionType::Expense,
            category: category.to_owned(),
            note: String::new(),
        }
    }

    #[test]
    fn deserialize_persisted_record() {
        let json = r#"{
            "id": "TX-lq2x8k3a-1abcd",
            "description": "Groceries",
            "amount": 42.5,
            "date": "2024-01-15",
            "type": "expense",
            "category": "Food",
            "note": "weekly shop"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id.as_inner(), "TX-lq2x8k3a-1abcd");
        assert_eq!(tx.amount, Decimal::new(4250, 2));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.category, Category::Food);
        assert_eq!(tx.signed_amount(), Decimal::new(-4250, 2));
    }

    #[test]
    fn deserialize_legacy_record_without_note() {
        let json = r#"{"id": 1700000000123, "description": "Pay", "amount": 1000,
            "date": "2024-01-01", "type": "income", "category": "Salary"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id.as_inner(), "1700000000123");
        assert!(tx.note.is_empty());
        assert_eq!(tx.signed_amount(), Decimal::new(1000, 0));
    }

    #[test]
    fn serialize_uses_wire_field_names() {
        let tx = input("Coffee", "3.20", Some("2024-02-01"), "Food")
            .validate(today())
            .unwrap()
            .into_transaction(TransactionId::from("t-1"));
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["category"], "Food");
        assert_eq!(value["date"], "2024-02-01");
        assert!(value["amount"].is_number());
        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn validate_trims_and_rounds() {
        let mut raw = input("  Lunch  ", " 12.345 ", None, " food ");
        raw.note = "  with team ".to_owned();
        let tx = raw.validate(today()).unwrap().into_transaction(TransactionId::from("t"));
        assert_eq!(tx.description, "Lunch");
        assert_eq!(tx.amount, Decimal::new(1234, 2));
        assert_eq!(tx.date, today());
        assert_eq!(tx.category, Category::Food);
        assert_eq!(tx.note, "with team");
    }

    #[test]
    fn empty_description_is_rejected_first() {
        let err = input("   ", "0", Some(""), "").validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyDescription);
    }

    #[test]
    fn amount_rules() {
        for amount in ["", "abc", "0", "-5", "0.001"] {
            let err = input("x", amount, None, "Food").validate(today()).unwrap_err();
            assert_eq!(err, ValidationError::InvalidAmount, "amount {amount:?}");
        }
    }

    #[test]
    fn amount_is_capped() {
        assert_eq!(MAX_AMOUNT, Decimal::new(10_000_000_000_000, 0));
        for amount in ["10000000000000.01", "12345678901234567.89", "79228162514264337593543950335"] {
            let err = input("x", amount, None, "Food").validate(today()).unwrap_err();
            assert_eq!(err, ValidationError::InvalidAmount, "amount {amount:?}");
        }
        let draft = input("x", "10000000000000", None, "Food").validate(today()).unwrap();
        assert_eq!(draft.amount, MAX_AMOUNT);
    }

    #[test]
    fn amounts_up_to_cap_survive_json() {
        for amount in ["10000000000000", "9999999999999.99", "1234567890123.45", "0.01"] {
            let tx = input("x", amount, None, "Food")
                .validate(today())
                .unwrap()
                .into_transaction(TransactionId::from("t"));
            let json = serde_json::to_string(&tx).unwrap();
            let back: Transaction = serde_json::from_str(&json).unwrap();
            assert_eq!(back.amount, tx.amount, "amount {amount:?}");
        }
    }

    #[test]
    fn date_rules() {
        let err = input("x", "1", Some("  "), "Food").validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingDate);
        let err = input("x", "1", Some("2024-13-40"), "Food").validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate);
    }

    #[test]
    fn category_rules() {
        let err = input("x", "1", None, "").validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingCategory);
        let err = input("x", "1", None, "Pets").validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory("Pets".to_owned()));
    }

    #[test]
    fn note_is_never_validated() {
        let draft = input("x", "1", None, "Other").validate(today());
        assert!(draft.is_ok());
    }
}
