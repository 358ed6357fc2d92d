use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use strata_core::DomainError;

/// Map a domain error onto a stable HTTP code + JSON envelope.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::NoRecipients => (StatusCode::NOT_FOUND, "no_recipients"),
        DomainError::Unauthorized => (StatusCode::FORBIDDEN, "forbidden"),
        DomainError::AlreadyPaid => (StatusCode::CONFLICT, "already_paid"),
        DomainError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        DomainError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
        DomainError::Gateway(_) => (StatusCode::BAD_GATEWAY, "gateway_error"),
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
