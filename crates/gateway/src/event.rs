//! Gateway-signed settlement events.
//!
//! The gateway reports completed charges as a JSON payload plus an
//! HMAC-SHA256 signature over the exact payload bytes. Verification is the
//! sole gate into the ledger's settlement path; any client-reported paid
//! flag is advisory.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use strata_core::{DomainError, DomainResult, DueId};

type HmacSha256 = Hmac<Sha256>;

/// A completed (or failed) charge as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub due_id: DueId,
    pub transaction_id: String,
    pub payment_method: String,
    pub amount_minor: u64,
    /// Whether the charge actually completed.
    pub settled: bool,
}

/// Envelope carrying the raw payload and its hex signature.
///
/// The payload stays a string: re-serializing the event could reorder keys
/// and break the signature, so verification always runs over the original
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSettlementEvent {
    pub payload: String,
    pub signature: String,
}

impl SignedSettlementEvent {
    /// Sign an event. Used by the in-memory gateway and by tests; a real
    /// deployment receives these pre-signed from the provider.
    pub fn sign(event: &SettlementEvent, secret: &[u8]) -> DomainResult<Self> {
        let payload = serde_json::to_string(event)
            .map_err(|e| DomainError::gateway(format!("cannot encode settlement event: {e}")))?;
        let mut mac = mac(secret)?;
        mac.update(payload.as_bytes());
        let signature = hex_encode(&mac.finalize().into_bytes());
        Ok(Self { payload, signature })
    }

    /// Verify the signature and decode the payload.
    ///
    /// Failure is a `Gateway` error: a bad signature means the event did not
    /// come from the gateway and must not touch any due.
    pub fn verify(&self, secret: &[u8]) -> DomainResult<SettlementEvent> {
        let expected = hex_decode(&self.signature)
            .ok_or_else(|| DomainError::gateway("malformed settlement signature"))?;

        let mut mac = mac(secret)?;
        mac.update(self.payload.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| DomainError::gateway("settlement signature mismatch"))?;

        serde_json::from_str(&self.payload)
            .map_err(|e| DomainError::gateway(format!("malformed settlement payload: {e}")))
    }
}

fn mac(secret: &[u8]) -> DomainResult<HmacSha256> {
    HmacSha256::new_from_slice(secret)
        .map_err(|_| DomainError::gateway("invalid webhook secret"))
}

fn hex_encode(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn hex_decode(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}
