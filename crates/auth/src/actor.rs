use serde::{Deserialize, Serialize};

use strata_core::MemberId;

use crate::Role;

/// An authenticated caller: member identity plus role.
///
/// Every mutating operation in the domain takes an explicit `&Actor` so the
/// capability check happens uniformly at the operation boundary instead of
/// being re-derived per route.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub member_id: MemberId,
    pub role: Role,
}

impl Actor {
    pub fn new(member_id: MemberId, role: Role) -> Self {
        Self { member_id, role }
    }

    pub fn admin(member_id: MemberId) -> Self {
        Self::new(member_id, Role::Admin)
    }

    pub fn resident(member_id: MemberId) -> Self {
        Self::new(member_id, Role::Resident)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
