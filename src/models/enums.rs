//! Enumeration types for constrained ledger values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when text does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Name of the enumeration that failed to parse.
    kind: &'static str,
    /// The rejected input.
    value: String,
}

impl ParseEnumError {
    /// Creates an error for the given enumeration name and input.
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }

    /// Returns the rejected input.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in; counts positively toward the balance.
    Income,
    /// Money going out; counts negatively toward the balance.
    #[default]
    Expense,
}

impl TransactionType {
    /// Returns the persisted label.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseEnumError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ParseEnumError::new("transaction type", s)),
        }
    }
}

/// Fixed set of transaction categories.
///
/// Persisted as the variant label (e.g. `"Food"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Wages and salary.
    Salary,
    /// Freelance or contract work.
    Freelance,
    /// Investment returns.
    Investment,
    /// Gifts received or given.
    Gift,
    /// Groceries and dining.
    Food,
    /// Commuting and travel.
    Transport,
    /// General shopping.
    Shopping,
    /// Rent, utilities and other bills.
    Bills,
    /// Leisure and entertainment.
    Entertainment,
    /// Medical and wellbeing.
    Health,
    /// Courses, books and tuition.
    Education,
    /// Anything else.
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 12] = [
        Self::Salary,
        Self::Freelance,
        Self::Investment,
        Self::Gift,
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Bills,
        Self::Entertainment,
        Self::Health,
        Self::Education,
        Self::Other,
    ];

    /// Returns the persisted label.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investment => "Investment",
            Self::Gift => "Gift",
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    /// Parses a label case-insensitively.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

/// Display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Returns the persisted label.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseEnumError::new("theme", s)),
        }
    }
}

/// Input field of a new transaction, used to point at a rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Description text.
    Description,
    /// Amount text.
    Amount,
    /// Date text.
    Date,
    /// Category label.
    Category,
}

impl Field {
    /// Returns the lowercase field name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for Field {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_serde() {
        let json = serde_json::to_string(&TransactionType::Income).unwrap();
        assert_eq!(json, r#""income""#);
        let deserialized: TransactionType = serde_json::from_str(r#""expense""#).unwrap();
        assert_eq!(deserialized, TransactionType::Expense);
    }

    #[test]
    fn transaction_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn category_serde_uses_label() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, r#""Entertainment""#);
        let deserialized: Category = serde_json::from_str(r#""Bills""#).unwrap();
        assert_eq!(deserialized, Category::Bills);
    }

    #[test]
    fn category_from_str_is_case_insensitive() {
        assert_eq!(" food ".parse::<Category>().unwrap(), Category::Food);
        let err = "Pets".parse::<Category>().unwrap_err();
        assert_eq!(err.value(), "Pets");
        assert_eq!(err.to_string(), "unknown category: Pets");
    }

    #[test]
    fn every_category_label_parses_back() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn theme_labels() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert!("sepia".parse::<Theme>().is_err());
    }
}
