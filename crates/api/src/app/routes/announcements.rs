use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::post,
};
use chrono::Utc;

use strata_billing::NewAnnouncement;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new().route("/", post(publish).get(list))
}

pub async fn publish(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<NewAnnouncement>,
) -> axum::response::Response {
    match services.announcer.publish(ctx.actor(), body, Utc::now()) {
        Ok((announcement, deliveries)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "announcement": announcement,
                "deliveries": deliveries,
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.announcer.list() {
        Ok(items) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
