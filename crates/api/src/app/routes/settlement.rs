use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::post,
};
use chrono::Utc;

use strata_gateway::SignedSettlementEvent;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new().route("/intent", post(create_intent))
}

pub async fn create_intent(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateIntentRequest>,
) -> axum::response::Response {
    let due_id = match body.due_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid due id");
        }
    };
    let amount = match dto::parse_amount(body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.reconciliation.create_intent(ctx.actor(), due_id, amount) {
        Ok(intent) => (StatusCode::CREATED, Json(dto::intent_to_json(&intent))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Unauthenticated by design: the HMAC signature over the payload is the
/// authentication. Mounted outside the bearer-token middleware.
pub async fn confirm(
    Extension(services): Extension<Arc<AppServices>>,
    Json(signed): Json<SignedSettlementEvent>,
) -> axum::response::Response {
    match services.reconciliation.confirm(&signed, Utc::now()) {
        Ok((due, newly_settled)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "due": dto::due_to_json(&due),
                "newly_settled": newly_settled,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
