//! Command dispatch for presentation layers.
//!
//! A [`Session`] pairs a [`LedgerStore`] with the current filter. The
//! presentation layer turns each user action into a [`Command`], hands it
//! to [`Session::dispatch`], and re-renders from the returned
//! [`Response`].

use crate::error::{LedgerError, Result};
use crate::ledger::{LedgerSnapshot, LedgerStore, TransactionFilter};
use crate::models::{Field, NewTransaction, Theme, Transaction, TransactionId};
use crate::storage::Storage;

/// Confirmation shown after a transaction is added.
pub const ADDED_MESSAGE: &str = "Transaction added successfully!";

/// Confirmation shown after a transaction is deleted.
pub const DELETED_MESSAGE: &str = "Transaction deleted!";

/// Confirmation shown after the ledger is cleared.
pub const CLEARED_MESSAGE: &str = "All transactions cleared!";

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the new-transaction form.
    Submit(NewTransaction),
    /// Delete one transaction.
    Delete(TransactionId),
    /// Replace the current filter.
    ChangeFilter(TransactionFilter),
    /// Clear the ledger; ignored unless the user confirmed.
    ClearAll {
        /// Whether the user confirmed the prompt.
        confirmed: bool,
    },
    /// Change the display theme.
    SetTheme(Theme),
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A mutation succeeded.
    Success(&'static str),
    /// Submitted input was rejected.
    Invalid {
        /// Field to refocus.
        field: Field,
        /// Human-readable reason.
        message: String,
    },
}

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// At most one message to show.
    pub notice: Option<Notice>,
    /// Transaction created by a successful submit.
    pub created: Option<Transaction>,
    /// Current state to render.
    pub snapshot: LedgerSnapshot,
}

/// A ledger plus the filter currently applied to it.
#[derive(Debug)]
pub struct Session<S: Storage> {
    /// The owned ledger.
    store: LedgerStore<S>,
    /// Filter applied to every snapshot.
    filter: TransactionFilter,
}

impl<S: Storage> Session<S> {
    /// Wraps a loaded store with no filter applied.
    #[inline]
    #[must_use]
    pub const fn new(store: LedgerStore<S>) -> Self {
        Self {
            store,
            filter: TransactionFilter::new(),
        }
    }

    /// Handles one command and returns what to render.
    ///
    /// Validation failures are reported through [`Notice::Invalid`] rather
    /// than as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting a mutation fails.
    #[tracing::instrument(skip_all)]
    pub fn dispatch(&mut self, command: Command) -> Result<Response> {
        let mut created = None;
        let notice = match command {
            Command::Submit(entry) => match self.store.add(entry) {
                Ok(tx) => {
                    created = Some(tx);
                    Some(Notice::Success(ADDED_MESSAGE))
                }
                Err(LedgerError::Validation(err)) => {
                    tracing::debug!(field = %err.field(), "rejected submission");
                    Some(Notice::Invalid {
                        field: err.field(),
                        message: err.to_string(),
                    })
                }
                Err(err) => return Err(err),
            },
            Command::Delete(id) => self
                .store
                .remove(&id)?
                .then_some(Notice::Success(DELETED_MESSAGE)),
            Command::ChangeFilter(filter) => {
                self.filter = filter;
                None
            }
            Command::ClearAll { confirmed: true } => {
                self.store.clear()?;
                Some(Notice::Success(CLEARED_MESSAGE))
            }
            Command::ClearAll { confirmed: false } => None,
            Command::SetTheme(theme) => {
                self.store.set_theme(theme)?;
                None
            }
        };
        Ok(Response {
            notice,
            created,
            snapshot: self.snapshot(),
        })
    }

    /// Returns the current state under the active filter.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.store.snapshot(&self.filter)
    }

    /// Returns the active filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> TransactionFilter {
        self.filter
    }

    /// Returns the underlying store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    /// Consumes the session and returns the store.
    #[inline]
    #[must_use]
    pub fn into_store(self) -> LedgerStore<S> {
        self.store
    }
}
