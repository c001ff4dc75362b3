use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use clubhub_core::{ClubId, EventId};
use clubhub_events::NewEvent;

use crate::app::{dto, errors, services::AppServices};
use crate::context::CallerContext;

fn parse_event_id(id: &str) -> Result<EventId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid event id")
    })
}

/// GET /events
pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.service.list_events() {
        Ok(events) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": events }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /events/:id
pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let event_id = match parse_event_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.get_event(event_id) {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /events
pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateEventRequest>,
) -> axum::response::Response {
    let club_id: ClubId = match body.club_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid club id");
        }
    };

    let attrs = NewEvent {
        club_id,
        title: body.title,
        description: body.description,
        starts_at: body.starts_at,
        ends_at: body.ends_at,
        location: body.location,
        category: body.category,
        image_url: body.image_url,
        payment_required: body.payment_required.unwrap_or(false),
    };

    match services.service.create_event(caller.user_id(), attrs) {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /events/:id
pub async fn update_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateEventRequest>,
) -> axum::response::Response {
    let event_id = match parse_event_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .service
        .update_event(caller.user_id(), event_id, body.into())
    {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// DELETE /events/:id
pub async fn delete_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let event_id = match parse_event_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.delete_event(caller.user_id(), event_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "event deleted" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /events/:id/register
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let event_id = match parse_event_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.register_for_event(caller.user_id(), event_id) {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /me/events - events the caller registered for.
pub async fn my_registrations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> axum::response::Response {
    match services.service.my_registrations(caller.user_id()) {
        Ok(events) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": events }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
