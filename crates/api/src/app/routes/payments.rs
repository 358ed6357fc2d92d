use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;

use strata_core::DueId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_due).get(list_dues))
        .route("/batch", post(issue_batch))
        .route("/my", get(my_dues))
        .route("/:id", put(update_due).delete(delete_due))
        .route("/remind/:id", post(remind))
        .route("/remind-upcoming", post(remind_upcoming))
}

pub async fn issue_batch(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::BatchIssueRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount(body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let member_ids = match dto::parse_member_ids(body.member_ids) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let outcome = match services.orchestrator.issue_batch(
        ctx.actor(),
        amount,
        body.due_date,
        member_ids.as_deref(),
        Utc::now(),
    ) {
        Ok(outcome) => outcome,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "dues": outcome.dues.iter().map(dto::due_to_json).collect::<Vec<_>>(),
            "deliveries": outcome.deliveries,
        })),
    )
        .into_response()
}

pub async fn create_due(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateDueRequest>,
) -> axum::response::Response {
    let amount = match dto::parse_amount(body.amount) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let member_id = match body.member_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid member id");
        }
    };

    // A single due is a one-member batch; an unknown member resolves to no
    // recipients.
    let mut dues = match services.ledger.create_batch(
        ctx.actor(),
        amount,
        body.due_date,
        Some(&[member_id]),
        Utc::now(),
    ) {
        Ok(dues) => dues,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "due": dto::due_to_json(&dues.remove(0)) })),
    )
        .into_response()
}

pub async fn list_dues(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    match services.ledger.list_all(ctx.actor()) {
        Ok(dues) => {
            let items = dues.iter().map(dto::due_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn my_dues(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let member_id = ctx.actor().member_id;
    match services.ledger.list_for_owner(ctx.actor(), member_id) {
        Ok(dues) => {
            let items = dues.iter().map(dto::due_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_due(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateDueRequest>,
) -> axum::response::Response {
    let due_id = match parse_due_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch = match body.into_patch() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.update(ctx.actor(), due_id, &patch, Utc::now()) {
        Ok(due) => (
            StatusCode::OK,
            Json(serde_json::json!({ "due": dto::due_to_json(&due) })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_due(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let due_id = match parse_due_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.delete(ctx.actor(), due_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remind(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let due_id = match parse_due_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orchestrator.send_reminder(ctx.actor(), due_id) {
        Ok(delivery) => (
            StatusCode::OK,
            Json(serde_json::json!({ "delivery": delivery })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remind_upcoming(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    body: Option<Json<dto::RemindUpcomingRequest>>,
) -> axum::response::Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let today = Utc::now().date_naive();

    match services
        .orchestrator
        .remind_upcoming(ctx.actor(), body.within_days, today)
    {
        Ok(deliveries) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deliveries": deliveries })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn parse_due_id(id: &str) -> Result<DueId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid due id"))
}
