//! Single-user personal finance ledger.
//!
//! This crate records income and expense entries, keeps them newest
//! first, computes balance and per-direction totals, filters the visible
//! list, and mirrors the whole ledger into a key-value [`storage`] slot
//! after every change.

pub mod error;
pub mod ledger;
pub mod models;
pub mod session;
pub mod storage;
