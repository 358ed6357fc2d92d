//! Capability checks at the operation boundary.

use thiserror::Error;

use strata_core::{DomainError, MemberId};

use crate::Actor;

/// Admin-gated capabilities consumed by the ledger and orchestrator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create, amend, and delete dues.
    ManageDues,
    /// Read every member's dues.
    ViewAllDues,
    /// Trigger reminder dispatches.
    RemindMembers,
    /// Publish announcements to the whole society.
    PublishAnnouncements,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageDues => "dues.manage",
            Capability::ViewAllDues => "dues.view_all",
            Capability::RemindMembers => "notify.remind",
            Capability::PublishAnnouncements => "announcements.publish",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing capability '{}'", .0.as_str())]
    MissingCapability(Capability),

    #[error("forbidden: caller does not own this record")]
    NotOwner,
}

impl From<AuthzError> for DomainError {
    fn from(_: AuthzError) -> Self {
        DomainError::Unauthorized
    }
}

/// Authorize a capability for an actor.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Admins hold every capability; residents hold none of them and act only
/// through ownership-scoped paths.
pub fn authorize(actor: &Actor, capability: Capability) -> Result<(), AuthzError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::MissingCapability(capability))
    }
}

/// Authorize an ownership-scoped read or settlement: the actor must own the
/// record or be an admin.
pub fn authorize_owner(actor: &Actor, owner: MemberId) -> Result<(), AuthzError> {
    if actor.is_admin() || actor.member_id == owner {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_capability() {
        let admin = Actor::admin(MemberId::new());
        for cap in [
            Capability::ManageDues,
            Capability::ViewAllDues,
            Capability::RemindMembers,
            Capability::PublishAnnouncements,
        ] {
            assert!(authorize(&admin, cap).is_ok());
        }
    }

    #[test]
    fn resident_is_denied_admin_capabilities() {
        let resident = Actor::resident(MemberId::new());
        let err = authorize(&resident, Capability::ManageDues).unwrap_err();
        assert!(matches!(err, AuthzError::MissingCapability(Capability::ManageDues)));
    }

    #[test]
    fn owner_check_allows_self_and_admin_only() {
        let owner = MemberId::new();
        assert!(authorize_owner(&Actor::resident(owner), owner).is_ok());
        assert!(authorize_owner(&Actor::admin(MemberId::new()), owner).is_ok());
        assert!(authorize_owner(&Actor::resident(MemberId::new()), owner).is_err());
    }
}
