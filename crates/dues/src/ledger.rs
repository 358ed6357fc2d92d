//! The due ledger service.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use strata_auth::{Actor, Capability, authorize, authorize_owner};
use strata_core::{Amount, DomainError, DomainResult, DueId, MemberId};
use strata_members::MemberStore;

use crate::{Due, DuePatch, DueStore};

/// Owns the collection of dues.
///
/// Every mutating operation takes an explicit `&Actor`; capability and
/// ownership checks happen here, not per route. The settlement write path
/// (`mark_paid`) is actor-less: it is only reachable through payment
/// reconciliation, which has already verified the gateway's signature.
pub struct DueLedger {
    dues: Arc<dyn DueStore>,
    members: Arc<dyn MemberStore>,
}

impl DueLedger {
    pub fn new(dues: Arc<dyn DueStore>, members: Arc<dyn MemberStore>) -> Self {
        Self { dues, members }
    }

    /// Create one unpaid due per targeted member.
    ///
    /// An empty/absent `member_ids` targets every known member. Resolving to
    /// zero members fails with `NoRecipients` before anything is written; a
    /// bulk-insert failure surfaces as `Persistence`.
    pub fn create_batch(
        &self,
        actor: &Actor,
        amount: Amount,
        due_date: NaiveDate,
        member_ids: Option<&[MemberId]>,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Due>> {
        authorize(actor, Capability::ManageDues)?;

        if !amount.is_positive() {
            return Err(DomainError::invalid_amount("due amount must be positive"));
        }

        let targets = match member_ids {
            Some(ids) if !ids.is_empty() => self.members.list_by_ids(ids)?,
            _ => self.members.list()?,
        };
        if targets.is_empty() {
            return Err(DomainError::NoRecipients);
        }

        let dues: Vec<Due> = targets
            .iter()
            .map(|member| Due::new(DueId::new(), member.id, amount, due_date, now))
            .collect();

        self.dues.insert_many(dues.clone())?;
        tracing::info!(count = dues.len(), %amount, %due_date, "dues batch created");
        Ok(dues)
    }

    /// Admin edit of amount/due-date/settlement metadata.
    ///
    /// Owners never mutate dues directly; their settlement flows through
    /// reconciliation, so a non-admin caller is rejected outright and any
    /// client-reported paid flag stays advisory.
    pub fn update(
        &self,
        actor: &Actor,
        due_id: DueId,
        patch: &DuePatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Due> {
        authorize(actor, Capability::ManageDues)?;

        let mut due = self.get(due_id)?;
        let was_paid = due.is_paid;
        due.apply_patch(patch, now)?;
        self.dues.put(due.clone())?;

        if was_paid {
            // Amending a settled record is allowed but audit-relevant.
            tracing::warn!(due_id = %due_id, actor = %actor.member_id, "paid due amended by admin");
        } else {
            tracing::info!(due_id = %due_id, actor = %actor.member_id, "due updated");
        }
        Ok(due)
    }

    /// Hard delete by explicit admin action. Dues are never deleted
    /// automatically.
    pub fn delete(&self, actor: &Actor, due_id: DueId) -> DomainResult<()> {
        authorize(actor, Capability::ManageDues)?;

        if !self.dues.remove(due_id)? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(due_id = %due_id, actor = %actor.member_id, "due deleted");
        Ok(())
    }

    pub fn list_all(&self, actor: &Actor) -> DomainResult<Vec<Due>> {
        authorize(actor, Capability::ViewAllDues)?;
        self.dues.list_all()
    }

    /// Owner-scoped read; can never leak other owners' rows because the
    /// query is keyed by the checked member id.
    pub fn list_for_owner(&self, actor: &Actor, member_id: MemberId) -> DomainResult<Vec<Due>> {
        authorize_owner(actor, member_id)?;
        self.dues.list_for_member(member_id)
    }

    pub fn get(&self, due_id: DueId) -> DomainResult<Due> {
        self.dues.get(due_id)?.ok_or(DomainError::NotFound)
    }

    /// Settlement write path, reached only via verified reconciliation.
    ///
    /// Returns the due plus whether it was newly settled; a duplicate
    /// confirmation with the same transaction id reports `false` and leaves
    /// the record untouched, so repeat webhook delivery causes no duplicate
    /// audit or notification side effects.
    pub fn mark_paid(
        &self,
        due_id: DueId,
        method: &str,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<(Due, bool)> {
        let mut due = self.get(due_id)?;
        let newly_settled = due.settle(method, transaction_id, now)?;

        if newly_settled {
            self.dues.put(due.clone())?;
            tracing::info!(due_id = %due_id, method, transaction_id, "due settled");
        } else {
            tracing::debug!(due_id = %due_id, transaction_id, "duplicate settlement confirmation ignored");
        }
        Ok((due, newly_settled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use strata_members::{InMemoryMemberStore, Member};

    use crate::InMemoryDueStore;

    struct Harness {
        ledger: DueLedger,
        admin: Actor,
        members: Vec<Member>,
    }

    fn harness(member_count: usize) -> Harness {
        let member_store = Arc::new(InMemoryMemberStore::new());
        let mut members = Vec::new();
        for i in 0..member_count {
            let member = Member::new(
                MemberId::new(),
                format!("Member {i}"),
                format!("member{i}@example.com"),
                format!("A-{i}"),
                false,
                Utc::now(),
            )
            .unwrap();
            member_store.upsert(member.clone()).unwrap();
            members.push(member);
        }

        let ledger = DueLedger::new(Arc::new(InMemoryDueStore::new()), member_store);
        Harness {
            ledger,
            admin: Actor::admin(MemberId::new()),
            members,
        }
    }

    fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    fn amount() -> Amount {
        Amount::from_minor(50_000)
    }

    #[test]
    fn batch_without_ids_targets_every_member() {
        let h = harness(3);
        let dues = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap();
        assert_eq!(dues.len(), 3);
        assert!(dues.iter().all(|d| !d.is_paid));
    }

    #[test]
    fn batch_with_subset_targets_exactly_that_subset() {
        let h = harness(4);
        let subset = [h.members[0].id, h.members[2].id];
        let dues = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), Some(&subset), Utc::now())
            .unwrap();

        let mut billed: Vec<MemberId> = dues.iter().map(|d| d.member_id).collect();
        billed.sort();
        let mut expected = subset.to_vec();
        expected.sort();
        assert_eq!(billed, expected);
    }

    #[test]
    fn batch_with_no_members_fails_with_no_recipients() {
        let h = harness(0);
        let err = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::NoRecipients);
        assert!(h.ledger.list_all(&h.admin).unwrap().is_empty());
    }

    #[test]
    fn batch_requires_admin() {
        let h = harness(2);
        let resident = Actor::resident(h.members[0].id);
        let err = h
            .ledger
            .create_batch(&resident, amount(), due_date(), None, Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }

    #[test]
    fn bulk_insert_failure_surfaces_persistence() {
        struct FailingDueStore;

        impl DueStore for FailingDueStore {
            fn insert_many(&self, _dues: Vec<Due>) -> DomainResult<()> {
                Err(DomainError::persistence("write refused"))
            }
            fn get(&self, _id: DueId) -> DomainResult<Option<Due>> {
                Ok(None)
            }
            fn put(&self, _due: Due) -> DomainResult<()> {
                Err(DomainError::persistence("write refused"))
            }
            fn remove(&self, _id: DueId) -> DomainResult<bool> {
                Ok(false)
            }
            fn list_all(&self) -> DomainResult<Vec<Due>> {
                Ok(Vec::new())
            }
            fn list_for_member(&self, _member_id: MemberId) -> DomainResult<Vec<Due>> {
                Ok(Vec::new())
            }
        }

        let member_store = Arc::new(InMemoryMemberStore::new());
        member_store
            .upsert(
                Member::new(
                    MemberId::new(),
                    "Asha",
                    "asha@example.com",
                    "A-1",
                    false,
                    Utc::now(),
                )
                .unwrap(),
            )
            .unwrap();
        let ledger = DueLedger::new(Arc::new(FailingDueStore), member_store);

        let err = ledger
            .create_batch(
                &Actor::admin(MemberId::new()),
                amount(),
                due_date(),
                None,
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[test]
    fn update_patches_amount_and_date() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        let patch = DuePatch {
            amount: Some(Amount::from_minor(60_000)),
            due_date: NaiveDate::from_ymd_opt(2025, 2, 28),
            ..DuePatch::default()
        };
        let updated = h.ledger.update(&h.admin, due.id, &patch, Utc::now()).unwrap();
        assert_eq!(updated.amount, Amount::from_minor(60_000));
        assert_eq!(updated.due_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn update_unknown_due_is_not_found() {
        let h = harness(1);
        let err = h
            .ledger
            .update(&h.admin, DueId::new(), &DuePatch::default(), Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn update_rejects_non_admin_even_for_own_due() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        let owner = Actor::resident(due.member_id);
        let patch = DuePatch {
            is_paid: Some(true),
            payment_method: Some("Cash".into()),
            ..DuePatch::default()
        };
        let err = h.ledger.update(&owner, due.id, &patch, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }

    #[test]
    fn delete_removes_and_second_delete_is_not_found() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        h.ledger.delete(&h.admin, due.id).unwrap();
        let err = h.ledger.delete(&h.admin, due.id).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn owner_listing_never_leaks_other_rows() {
        let h = harness(2);
        h.ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap();

        let first = h.members[0].id;
        let own = h
            .ledger
            .list_for_owner(&Actor::resident(first), first)
            .unwrap();
        assert_eq!(own.len(), 1);
        assert!(own.iter().all(|d| d.member_id == first));

        // A resident asking for someone else's rows is rejected outright.
        let other = h.members[1].id;
        let err = h
            .ledger
            .list_for_owner(&Actor::resident(first), other)
            .unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }

    #[test]
    fn mark_paid_then_owner_listing_shows_settlement() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        let (paid, newly) = h
            .ledger
            .mark_paid(due.id, "Stripe", "txn_42", Utc::now())
            .unwrap();
        assert!(newly);
        assert!(paid.is_paid);

        let owner = Actor::resident(due.member_id);
        let rows = h.ledger.list_for_owner(&owner, due.member_id).unwrap();
        assert_eq!(rows[0].payment_method.as_deref(), Some("Stripe"));
        assert_eq!(rows[0].transaction_id.as_deref(), Some("txn_42"));
        assert!(rows[0].is_paid);
    }

    #[test]
    fn mark_paid_twice_with_same_transaction_is_a_noop() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        let (_, first) = h
            .ledger
            .mark_paid(due.id, "Stripe", "txn_42", Utc::now())
            .unwrap();
        let (after, second) = h
            .ledger
            .mark_paid(due.id, "Stripe", "txn_42", Utc::now())
            .unwrap();
        assert!(first);
        assert!(!second);
        assert!(after.is_paid);

        let paid_count = h
            .ledger
            .list_all(&h.admin)
            .unwrap()
            .iter()
            .filter(|d| d.is_paid)
            .count();
        assert_eq!(paid_count, 1);
    }

    #[test]
    fn mark_paid_with_different_transaction_conflicts() {
        let h = harness(1);
        let due = h
            .ledger
            .create_batch(&h.admin, amount(), due_date(), None, Utc::now())
            .unwrap()
            .remove(0);

        h.ledger
            .mark_paid(due.id, "Stripe", "txn_42", Utc::now())
            .unwrap();
        let err = h
            .ledger
            .mark_paid(due.id, "Stripe", "txn_43", Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
