//! Member store boundary.
//!
//! The document store itself is an external collaborator; the pipeline only
//! issues reads/writes through this trait. The in-memory implementation is
//! the dev/test store.

use std::collections::HashMap;
use std::sync::RwLock;

use strata_core::{DomainError, DomainResult, MemberId};

use crate::Member;

/// Read/write boundary for member records.
pub trait MemberStore: Send + Sync {
    fn get(&self, id: MemberId) -> DomainResult<Option<Member>>;

    /// All known members, in stable id order.
    fn list(&self) -> DomainResult<Vec<Member>>;

    /// Members for an explicit id set; unknown ids are simply absent from the
    /// result (mirrors a `$in` query).
    fn list_by_ids(&self, ids: &[MemberId]) -> DomainResult<Vec<Member>>;

    fn upsert(&self, member: Member) -> DomainResult<()>;
}

/// In-memory member store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    inner: RwLock<HashMap<MemberId, Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Lock poisoning counts as a store failure and is surfaced, not swallowed:
// the ledger must be able to report Persistence to its caller.
fn poisoned() -> DomainError {
    DomainError::persistence("member store lock poisoned")
}

impl MemberStore for InMemoryMemberStore {
    fn get(&self, id: MemberId) -> DomainResult<Option<Member>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Member>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut members: Vec<Member> = map.values().cloned().collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    fn list_by_ids(&self, ids: &[MemberId]) -> DomainResult<Vec<Member>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut members: Vec<Member> = ids.iter().filter_map(|id| map.get(id).cloned()).collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    fn upsert(&self, member: Member) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(member.id, member);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(name: &str) -> Member {
        Member::new(
            MemberId::new(),
            name,
            format!("{name}@example.com"),
            "A-1",
            false,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn list_by_ids_skips_unknown_ids() {
        let store = InMemoryMemberStore::new();
        let a = member("asha");
        let b = member("ravi");
        store.upsert(a.clone()).unwrap();
        store.upsert(b.clone()).unwrap();

        let got = store.list_by_ids(&[a.id, MemberId::new()]).unwrap();
        assert_eq!(got, vec![a]);
    }

    #[test]
    fn upsert_replaces_existing_record() {
        let store = InMemoryMemberStore::new();
        let mut m = member("asha");
        store.upsert(m.clone()).unwrap();
        m.update_contact(Some("new@example.com".into()), None).unwrap();
        store.upsert(m.clone()).unwrap();

        assert_eq!(store.get(m.id).unwrap().unwrap().email, "new@example.com");
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
