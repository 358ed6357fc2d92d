use axum::{Router, routing::get};

pub mod announcements;
pub mod payments;
pub mod settlement;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/payments", payments::router())
        .nest("/settlement", settlement::router())
        .nest("/announcements", announcements::router())
}
