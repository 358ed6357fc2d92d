//! Request DTOs and JSON mapping helpers.
//!
//! Amounts cross the wire as decimal numbers and are converted to minor
//! units at this boundary; unknown fields are dropped by serde.

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use strata_core::{Amount, MemberId};
use strata_dues::{Due, DuePatch};
use strata_gateway::SettlementIntent;

use crate::app::errors;

#[derive(Debug, Deserialize)]
pub struct BatchIssueRequest {
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub member_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDueRequest {
    pub member_id: String,
    pub amount: f64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDueRequest {
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemindUpcomingRequest {
    #[serde(default = "default_within_days")]
    pub within_days: u64,
}

fn default_within_days() -> u64 {
    7
}

impl Default for RemindUpcomingRequest {
    fn default() -> Self {
        Self {
            within_days: default_within_days(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub due_id: String,
    pub amount: f64,
}

/// Parse a decimal wire amount, mapping failure to the standard envelope.
pub fn parse_amount(value: f64) -> Result<Amount, axum::response::Response> {
    Amount::from_decimal(value)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_amount", e.to_string()))
}

/// Parse an optional list of member id strings.
pub fn parse_member_ids(
    ids: Option<Vec<String>>,
) -> Result<Option<Vec<MemberId>>, axum::response::Response> {
    let Some(ids) = ids else { return Ok(None) };
    let mut parsed = Vec::with_capacity(ids.len());
    for id in &ids {
        let member_id = id.parse().map_err(|_| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                format!("invalid member id: {id}"),
            )
        })?;
        parsed.push(member_id);
    }
    Ok(Some(parsed))
}

impl UpdateDueRequest {
    pub fn into_patch(self) -> Result<DuePatch, axum::response::Response> {
        let amount = match self.amount {
            Some(value) => Some(parse_amount(value)?),
            None => None,
        };
        Ok(DuePatch {
            amount,
            due_date: self.due_date,
            is_paid: self.is_paid,
            payment_method: self.payment_method,
            transaction_id: self.transaction_id,
        })
    }
}

pub fn due_to_json(due: &Due) -> serde_json::Value {
    json!({
        "id": due.id.to_string(),
        "member_id": due.member_id.to_string(),
        "amount": due.amount.to_decimal(),
        "amount_display": due.amount.to_string(),
        "due_date": due.due_date,
        "is_paid": due.is_paid,
        "payment_method": due.payment_method,
        "transaction_id": due.transaction_id,
        "created_at": due.created_at,
        "updated_at": due.updated_at,
    })
}

pub fn intent_to_json(intent: &SettlementIntent) -> serde_json::Value {
    json!({
        "intent_id": intent.intent_id,
        "due_id": intent.due_id.to_string(),
        "amount_minor": intent.amount_minor,
        "currency": intent.currency,
        "client_secret": intent.client_secret,
    })
}
