use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use strata_core::{Amount, DomainError, DomainResult, DueId, MemberId};

/// One member's maintenance-fee obligation for a period.
///
/// Dues are independent units; there is no invoice-aggregation entity above
/// them. The owning member is referenced, never owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub id: DueId,
    pub member_id: MemberId,
    pub amount: Amount,
    pub due_date: NaiveDate,
    pub is_paid: bool,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Due {
    /// A freshly issued, unpaid due.
    pub fn new(
        id: DueId,
        member_id: MemberId,
        amount: Amount,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            amount,
            due_date,
            is_paid: false,
            payment_method: None,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an admin edit.
    ///
    /// Invariant: a due flipped to paid must carry a non-empty payment
    /// method, either from the patch or already on the record.
    pub fn apply_patch(&mut self, patch: &DuePatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(amount) = patch.amount {
            if !amount.is_positive() {
                return Err(DomainError::invalid_amount("due amount must be positive"));
            }
            self.amount = amount;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(method) = &patch.payment_method {
            if method.trim().is_empty() {
                return Err(DomainError::validation("payment method must not be empty"));
            }
            self.payment_method = Some(method.clone());
        }
        if let Some(transaction_id) = &patch.transaction_id {
            self.transaction_id = Some(transaction_id.clone());
        }
        if let Some(is_paid) = patch.is_paid {
            if is_paid && self.payment_method.is_none() {
                return Err(DomainError::validation(
                    "a paid due must carry a payment method",
                ));
            }
            self.is_paid = is_paid;
        }

        self.updated_at = now;
        Ok(())
    }

    /// Settle this due from a confirmed gateway settlement.
    ///
    /// Returns `true` when the due was newly settled. A repeat confirmation
    /// carrying the same transaction id is a no-op (`false`); a different
    /// transaction id against a paid due is a conflict.
    pub fn settle(
        &mut self,
        method: &str,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        if method.trim().is_empty() {
            return Err(DomainError::validation("payment method must not be empty"));
        }
        if transaction_id.trim().is_empty() {
            return Err(DomainError::validation("transaction id must not be empty"));
        }

        if self.is_paid {
            if self.transaction_id.as_deref() == Some(transaction_id) {
                return Ok(false);
            }
            return Err(DomainError::conflict(format!(
                "due {} already settled under a different transaction",
                self.id
            )));
        }

        self.is_paid = true;
        self.payment_method = Some(method.to_string());
        self.transaction_id = Some(transaction_id.to_string());
        self.updated_at = now;
        Ok(true)
    }
}

/// Partial admin edit of a due. Unknown wire fields are dropped at the DTO
/// layer; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DuePatch {
    pub amount: Option<Amount>,
    pub due_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}
