//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts) plus the two external-collaborator failure classes
/// the core has to surface (store and gateway).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested due or member does not exist.
    #[error("not found")]
    NotFound,

    /// A batch operation resolved to an empty member set.
    #[error("no recipients: the resolved member set is empty")]
    NoRecipients,

    /// The document store failed a read or write.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The payment gateway rejected or failed an intent request.
    #[error("gateway failure: {0}")]
    Gateway(String),

    /// Operation attempted on a due that is already settled.
    #[error("due is already paid")]
    AlreadyPaid,

    /// Role or ownership mismatch at the operation boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// A monetary amount was malformed (non-finite, non-positive, overflow).
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflicting mutation (e.g. a second, different settlement).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
