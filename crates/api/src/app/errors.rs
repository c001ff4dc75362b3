use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use clubhub_infra::ServiceError;

/// Map an orchestration failure onto the HTTP error envelope.
///
/// Authorization denials are expected outcomes (403 with a reason code);
/// only consistency/store failures become 5xx.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Denied { reason } => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "error": "forbidden",
                "reason": reason.code(),
                "message": reason.message(),
            })),
        )
            .into_response(),
        ServiceError::NotFound { kind, id } => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{kind} not found: {id}"),
        ),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Invariant(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        ServiceError::Consistency(msg) => {
            tracing::error!(%msg, "consistency violation surfaced to a request");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "consistency_error", msg)
        }
        ServiceError::Store(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
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
