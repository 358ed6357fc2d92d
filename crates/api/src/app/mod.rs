//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: service construction (stores, dispatcher, gateway)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use tower::ServiceBuilder;

use strata_auth::Hs256TokenCodec;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String, webhook_secret: String) -> Router {
    let codec = Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { codec };

    let services = Arc::new(services::build_services(webhook_secret).await);

    // Protected routes: require a bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    // The settlement webhook authenticates by payload signature, not token.
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/settlement/confirm", post(routes::settlement::confirm))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
