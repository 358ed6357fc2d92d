//! Payment-gateway seam.

use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use strata_core::{DomainError, DueId};

/// A gateway-side object representing an in-progress charge.
///
/// Ephemeral: consumed once to hand the client secret to the payer, never
/// persisted by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementIntent {
    pub intent_id: String,
    pub due_id: DueId,
    /// Minor currency units, as the gateway expects.
    pub amount_minor: u64,
    pub currency: String,
    /// Opaque secret the payer's client uses to complete the charge.
    pub client_secret: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Could not reach the gateway (timeout, connection failure).
    #[error("gateway transport failure: {0}")]
    Transport(String),

    /// The gateway refused the request (4xx-class).
    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        DomainError::gateway(err.to_string())
    }
}

/// Charge-processing seam. Only intent creation is in scope; settlement
/// completion happens client-side and comes back as a signed event.
pub trait PaymentGateway: Send + Sync {
    fn create_intent(
        &self,
        due_id: DueId,
        amount_minor: u64,
        currency: &str,
    ) -> Result<SettlementIntent, GatewayError>;
}

/// In-memory gateway for dev/test: mints intents locally and records them.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    created: Mutex<Vec<SettlementIntent>>,
    failure: Mutex<Option<GatewayError>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_intent` fail with the given error.
    pub fn fail_with(&self, error: GatewayError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn created(&self) -> Vec<SettlementIntent> {
        self.created.lock().unwrap().clone()
    }
}

impl PaymentGateway for InMemoryGateway {
    fn create_intent(
        &self,
        due_id: DueId,
        amount_minor: u64,
        currency: &str,
    ) -> Result<SettlementIntent, GatewayError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        if amount_minor == 0 {
            return Err(GatewayError::Rejected("amount must be positive".to_string()));
        }

        let intent_id = format!("pi_{}", Uuid::now_v7().simple());
        let intent = SettlementIntent {
            client_secret: format!("{intent_id}_secret_{}", Uuid::now_v7().simple()),
            intent_id,
            due_id,
            amount_minor,
            currency: currency.to_string(),
        };
        self.created.lock().unwrap().push(intent.clone());
        Ok(intent)
    }
}
