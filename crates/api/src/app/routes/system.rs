use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CallerContext;

/// GET /health - liveness probe, no auth.
pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

/// GET /whoami - the caller's own record, read fresh.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> axum::response::Response {
    match services.service.get_user(caller.user_id()) {
        Ok(user) => (StatusCode::OK, Json(dto::UserResponse::from(user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
