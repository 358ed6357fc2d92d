//! Due store boundary.
//!
//! Per-record writes are atomic; a bulk insert is not transactional across
//! records, matching the document store this fronts. A partial batch failure
//! therefore surfaces as `Persistence` with whatever subset was written left
//! in place.

use std::collections::HashMap;
use std::sync::RwLock;

use strata_core::{DomainError, DomainResult, DueId, MemberId};

use crate::Due;

/// Read/write boundary for due records.
pub trait DueStore: Send + Sync {
    fn insert_many(&self, dues: Vec<Due>) -> DomainResult<()>;

    fn get(&self, id: DueId) -> DomainResult<Option<Due>>;

    /// Replace a due record (per-document write, last write wins).
    fn put(&self, due: Due) -> DomainResult<()>;

    /// Hard delete. Returns whether the record existed.
    fn remove(&self, id: DueId) -> DomainResult<bool>;

    /// Every due, in stable id order.
    fn list_all(&self) -> DomainResult<Vec<Due>>;

    /// Dues owned by one member, in stable id order.
    fn list_for_member(&self, member_id: MemberId) -> DomainResult<Vec<Due>>;
}

/// In-memory due store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryDueStore {
    inner: RwLock<HashMap<DueId, Due>>,
}

impl InMemoryDueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::persistence("due store lock poisoned")
}

impl DueStore for InMemoryDueStore {
    fn insert_many(&self, dues: Vec<Due>) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        for due in dues {
            map.insert(due.id, due);
        }
        Ok(())
    }

    fn get(&self, id: DueId) -> DomainResult<Option<Due>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn put(&self, due: Due) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(due.id, due);
        Ok(())
    }

    fn remove(&self, id: DueId) -> DomainResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }

    fn list_all(&self) -> DomainResult<Vec<Due>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut dues: Vec<Due> = map.values().cloned().collect();
        dues.sort_by_key(|d| d.id);
        Ok(dues)
    }

    fn list_for_member(&self, member_id: MemberId) -> DomainResult<Vec<Due>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut dues: Vec<Due> = map
            .values()
            .filter(|d| d.member_id == member_id)
            .cloned()
            .collect();
        dues.sort_by_key(|d| d.id);
        Ok(dues)
    }
}
