//! The transaction ledger and its derived views.
//!
//! [`LedgerStore`] owns the ordered list of transactions (newest first),
//! mirrors it into a [`Storage`] slot after every mutation, and computes
//! the filtered view, balance and totals the presentation layer renders.

use core::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{
    Category, IdGenerator, NewTransaction, ParseEnumError, Theme, Transaction, TransactionId,
    TransactionType,
};
use crate::storage::{Storage, THEME_KEY, TRANSACTIONS_KEY};

/// Text accepted by the filter parsers to mean "no restriction".
const ALL: &str = "all";

/// Read-side filter over the ledger.
///
/// Each axis is `None` for "all". A transaction passes when it satisfies
/// both axes.
///
/// # Examples
///
/// ```
/// use expense_ledger::ledger::TransactionFilter;
/// use expense_ledger::models::{Category, TransactionType};
///
/// let filter = TransactionFilter::new()
///     .kind(TransactionType::Expense)
///     .category(Category::Food);
/// assert_eq!(filter.kind, Some(TransactionType::Expense));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Required direction, or `None` for all.
    pub kind: Option<TransactionType>,
    /// Required category, or `None` for all.
    pub category: Option<Category>,
}

impl TransactionFilter {
    /// Creates an empty filter that matches all transactions.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: None,
            category: None,
        }
    }

    /// Restricts to transactions of the given direction.
    #[inline]
    #[must_use]
    pub const fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to transactions in the given category.
    #[inline]
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builds a filter from selector text, where `"all"` (or an empty
    /// string) leaves that axis unrestricted.
    ///
    /// # Errors
    ///
    /// Returns an error if either selector names an unknown value.
    #[inline]
    pub fn from_selectors(kind: &str, category: &str) -> core::result::Result<Self, ParseEnumError> {
        Ok(Self {
            kind: parse_selector(kind)?,
            category: parse_selector(category)?,
        })
    }

    /// Returns `true` if the transaction satisfies both axes.
    #[inline]
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.is_none_or(|kind| tx.kind == kind)
            && self.category.is_none_or(|category| tx.category == category)
    }
}

/// Parses one selector, mapping `"all"` to `None`.
fn parse_selector<T: FromStr<Err = ParseEnumError>>(
    text: &str,
) -> core::result::Result<Option<T>, ParseEnumError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    T::from_str(trimmed).map(Some)
}

/// Sums of amounts grouped by direction. Both are non-negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of expense amounts.
    pub expense: Decimal,
}

/// Everything the presentation layer needs after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Filtered transactions in ledger order.
    pub transactions: Vec<Transaction>,
    /// Balance over the whole ledger, not just the filtered view.
    pub balance: Decimal,
    /// Income and expense totals over the whole ledger.
    pub totals: Totals,
    /// Number of transactions in the filtered view.
    pub count: usize,
}

/// Returns the sum of amounts with income positive and expense negative.
///
/// Validated amounts are capped at
/// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT), but a hand-edited slot
/// can hold anything `Decimal` parses, so the sum saturates instead of
/// overflowing.
#[inline]
#[must_use]
pub fn balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(Transaction::signed_amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Returns income and expense sums, each computed independently.
///
/// Sums saturate like [`balance`].
#[inline]
#[must_use]
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut acc, tx| {
            match tx.kind {
                TransactionType::Income => acc.income = acc.income.saturating_add(tx.amount),
                TransactionType::Expense => acc.expense = acc.expense.saturating_add(tx.amount),
            }
            acc
        })
}

/// Owner of the ledger and its persisted mirror.
///
/// Built once with [`LedgerStore::load`] and held by the presentation
/// layer. Mutators take `&mut self`, so calls are strictly sequential.
///
/// Every mutation builds the next list, writes it to the
/// [`TRANSACTIONS_KEY`] slot, and only then replaces the in-memory list.
/// A failed write leaves both the stored and the in-memory ledger as they
/// were.
#[derive(Debug)]
pub struct LedgerStore<S: Storage> {
    /// Persistence backend.
    storage: S,
    /// Transactions, newest first.
    transactions: Vec<Transaction>,
    /// Source of fresh identifiers.
    ids: IdGenerator,
}

impl<S: Storage> LedgerStore<S> {
    /// Loads the ledger from `storage`.
    ///
    /// An absent, unreadable or malformed slot yields an empty ledger; the
    /// problem is logged and never returned.
    #[inline]
    pub fn load(storage: S) -> Self {
        Self::load_with_ids(storage, IdGenerator::default())
    }

    /// Loads the ledger using a custom identifier generator.
    #[tracing::instrument(skip_all)]
    pub fn load_with_ids(storage: S, ids: IdGenerator) -> Self {
        let transactions = match storage.read(TRANSACTIONS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<Transaction>>(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding malformed ledger state");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read ledger state");
                Vec::new()
            }
        };
        tracing::debug!(count = transactions.len(), "loaded ledger");
        Self {
            storage,
            transactions,
            ids,
        }
    }

    /// Validates `entry`, assigns it a fresh id, prepends it and persists
    /// the ledger. Returns the stored transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] with the first failing rule; the
    /// ledger is then untouched and nothing is written. Returns a storage
    /// or serialization error if persisting fails.
    #[tracing::instrument(skip_all)]
    pub fn add(&mut self, entry: NewTransaction) -> Result<Transaction> {
        let draft = entry.validate(today())?;
        let mut id = self.ids.next_id();
        while self.get(&id).is_some() {
            id = self.ids.next_id();
        }
        let tx = draft.into_transaction(id);

        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(tx.clone());
        next.extend(self.transactions.iter().cloned());
        self.commit(next)?;

        tracing::debug!(id = %tx.id, kind = %tx.kind, amount = %tx.amount, "added transaction");
        Ok(tx)
    }

    /// Removes the transaction with the given id and persists the ledger.
    ///
    /// Returns `false` (and writes nothing) if no transaction matched.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn remove(&mut self, id: &TransactionId) -> Result<bool> {
        if self.get(id).is_none() {
            tracing::debug!("no transaction to remove");
            return Ok(false);
        }
        let next: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.id != *id)
            .cloned()
            .collect();
        self.commit(next)?;
        tracing::debug!("removed transaction");
        Ok(true)
    }

    /// Empties the ledger and persists the empty state.
    ///
    /// Asking the user for confirmation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    #[tracing::instrument(skip_all)]
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.transactions.len();
        self.commit(Vec::new())?;
        tracing::debug!(removed, "cleared ledger");
        Ok(())
    }

    /// Returns the transactions matching `filter`, in ledger order.
    #[inline]
    #[must_use]
    pub fn view(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect()
    }

    /// Returns the filtered view together with the global balance and
    /// totals.
    #[inline]
    #[must_use]
    pub fn snapshot(&self, filter: &TransactionFilter) -> LedgerSnapshot {
        let transactions = self.view(filter);
        LedgerSnapshot {
            count: transactions.len(),
            transactions,
            balance: balance(&self.transactions),
            totals: totals(&self.transactions),
        }
    }

    /// Returns all transactions, newest first.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Returns the transaction with the given id.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == *id)
    }

    /// Returns the number of transactions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns `true` if the ledger holds no transactions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Returns the stored theme, defaulting to [`Theme::Light`] when the
    /// slot is absent, unreadable or holds an unknown value.
    #[inline]
    #[must_use]
    pub fn theme(&self) -> Theme {
        match self.storage.read(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err: ParseEnumError| {
                tracing::warn!(error = %err, "ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read theme");
                Theme::default()
            }
        }
    }

    /// Stores the theme preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    #[inline]
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.write(THEME_KEY, theme.as_str())
    }

    /// Returns the storage backend.
    #[inline]
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store and returns its storage backend.
    #[inline]
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Persists `next` and then makes it the current ledger.
    fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        let json = serde_json::to_string(&next).map_err(LedgerError::from)?;
        self.storage.write(TRANSACTIONS_KEY, &json)?;
        tracing::trace!(bytes = json.len(), count = next.len(), "persisted ledger");
        self.transactions = next;
        Ok(())
    }
}

/// Returns today's local date, used for entries without an explicit date.
fn today() -> NaiveDate {
    Local::now().date_naive()
}
