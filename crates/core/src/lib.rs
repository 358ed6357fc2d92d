//! `strata-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy, strongly-typed identifiers, and the money value object.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{AnnouncementId, DueId, MemberId};
pub use money::Amount;
