//! `strata-dues` — the due ledger.
//!
//! Owns the collection of maintenance dues: batch creation, per-due
//! mutation, owner/global queries, and the settlement write path used by
//! payment reconciliation.

pub mod due;
pub mod ledger;
pub mod store;

pub use due::{Due, DuePatch};
pub use ledger::DueLedger;
pub use store::{DueStore, InMemoryDueStore};
