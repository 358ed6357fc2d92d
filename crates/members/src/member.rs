use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strata_auth::Role;
use strata_core::{DomainError, DomainResult, MemberId};

/// A society member: identity, contact details, apartment, role.
///
/// Identity is immutable; contact fields are mutable. Dues reference members
/// by id and never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub apartment: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: impl Into<String>,
        apartment: impl Into<String>,
        is_admin: bool,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let member = Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            apartment: apartment.into(),
            is_admin,
            created_at,
        };
        member.validate()?;
        Ok(member)
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn role(&self) -> Role {
        Role::from_admin_flag(self.is_admin)
    }

    /// Replace mutable contact fields, re-validating the result.
    pub fn update_contact(
        &mut self,
        email: Option<String>,
        phone: Option<String>,
    ) -> DomainResult<()> {
        if let Some(email) = email {
            self.email = email;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        self.validate()
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("member name must not be empty"));
        }
        if self.apartment.trim().is_empty() {
            return Err(DomainError::validation("apartment identifier must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation("member email is malformed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_name_and_bad_email() {
        let now = Utc::now();
        assert!(Member::new(MemberId::new(), " ", "a@b.c", "A-1", false, now).is_err());
        assert!(Member::new(MemberId::new(), "Asha", "not-an-email", "A-1", false, now).is_err());
        assert!(Member::new(MemberId::new(), "Asha", "asha@example.com", "A-1", false, now).is_ok());
    }

    #[test]
    fn role_follows_admin_flag() {
        let now = Utc::now();
        let admin = Member::new(MemberId::new(), "R", "r@s.t", "B-2", true, now).unwrap();
        assert_eq!(admin.role(), Role::Admin);
        let resident = Member::new(MemberId::new(), "R", "r@s.t", "B-2", false, now).unwrap();
        assert_eq!(resident.role(), Role::Resident);
    }
}
