//! `strata-gateway` — payment-gateway boundary and reconciliation.
//!
//! The gateway itself is an external collaborator behind a trait. This crate
//! owns settlement-intent creation and the one trusted settlement trigger: a
//! gateway-signed event, verified here, driving the ledger's `mark_paid`.

pub mod client;
pub mod event;
pub mod reconcile;

pub use client::{GatewayError, InMemoryGateway, PaymentGateway, SettlementIntent};
pub use event::{SettlementEvent, SignedSettlementEvent};
pub use reconcile::Reconciliation;
