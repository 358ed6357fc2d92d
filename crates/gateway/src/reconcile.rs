//! Payment reconciliation: intents out, verified settlements in.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use strata_auth::{Actor, authorize_owner};
use strata_core::{Amount, DomainError, DomainResult, DueId};
use strata_dues::{Due, DueLedger};

use crate::client::{PaymentGateway, SettlementIntent};
use crate::event::SignedSettlementEvent;

/// Currency every due is charged in (minor units: paise).
pub const CURRENCY: &str = "inr";

/// Bridges the gateway's settlement lifecycle to the due ledger.
pub struct Reconciliation {
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<DueLedger>,
    webhook_secret: Vec<u8>,
}

impl Reconciliation {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<DueLedger>,
        webhook_secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            webhook_secret: webhook_secret.into(),
        }
    }

    /// Mint a settlement intent for a due the actor owns (or administers).
    ///
    /// The requested amount must match the due's outstanding amount exactly;
    /// the gateway receives it in minor units.
    pub fn create_intent(
        &self,
        actor: &Actor,
        due_id: DueId,
        amount: Amount,
    ) -> DomainResult<SettlementIntent> {
        let due = self.ledger.get(due_id)?;
        authorize_owner(actor, due.member_id)?;

        if due.is_paid {
            return Err(DomainError::AlreadyPaid);
        }
        if !amount.is_positive() {
            return Err(DomainError::invalid_amount("intent amount must be positive"));
        }
        if amount != due.amount {
            return Err(DomainError::invalid_amount(
                "intent amount must match the outstanding due amount",
            ));
        }

        let intent = self
            .gateway
            .create_intent(due_id, amount.minor_units(), CURRENCY)?;
        tracing::info!(due_id = %due_id, intent_id = %intent.intent_id, "settlement intent created");
        Ok(intent)
    }

    /// Apply a gateway-signed settlement event.
    ///
    /// This is the only path that marks a due paid. Returns the due plus
    /// whether it was newly settled (`false` for an at-least-once redelivery
    /// of the same transaction).
    pub fn confirm(
        &self,
        signed: &SignedSettlementEvent,
        now: DateTime<Utc>,
    ) -> DomainResult<(Due, bool)> {
        let event = signed.verify(&self.webhook_secret)?;

        if !event.settled {
            return Err(DomainError::gateway(
                "settlement event does not report a completed charge",
            ));
        }

        let due = self.ledger.get(event.due_id)?;
        if event.amount_minor != due.amount.minor_units() {
            return Err(DomainError::conflict(
                "settled amount does not match the due amount",
            ));
        }

        self.ledger.mark_paid(
            event.due_id,
            &event.payment_method,
            &event.transaction_id,
            now,
        )
    }
}
