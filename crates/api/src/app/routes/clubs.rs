use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use clubhub_clubs::NewClub;
use clubhub_core::{ClubId, UserId};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CallerContext;

fn parse_club_id(id: &str) -> Result<ClubId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid club id")
    })
}

fn parse_user_id(id: &str) -> Result<UserId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id")
    })
}

/// GET /clubs
pub async fn list_clubs(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.service.list_clubs() {
        Ok(clubs) => (StatusCode::OK, Json(serde_json::json!({ "items": clubs }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /clubs/:id
pub async fn get_club(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.get_club(club_id) {
        Ok(club) => (StatusCode::OK, Json(club)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /clubs
pub async fn create_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateClubRequest>,
) -> axum::response::Response {
    let attrs = NewClub {
        name: body.name,
        description: body.description,
        category: body.category,
        logo: body.logo,
        banner: body.banner,
        colors: body.colors.unwrap_or_default(),
        social_links: body.social_links.unwrap_or_default(),
        contact: body.contact.unwrap_or_default(),
    };

    match services.service.create_club(caller.user_id(), attrs) {
        Ok(club) => (StatusCode::CREATED, Json(club)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /clubs/:id
pub async fn update_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateClubRequest>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .service
        .update_club(caller.user_id(), club_id, body.into())
    {
        Ok(club) => (StatusCode::OK, Json(club)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// DELETE /clubs/:id
pub async fn delete_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.delete_club(caller.user_id(), club_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "club deleted" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /clubs/:id/members
pub async fn invite_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::InviteMemberRequest>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let user_id = match parse_user_id(&body.user_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .service
        .invite_member(caller.user_id(), club_id, user_id, body.role)
    {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "member added" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// DELETE /clubs/:id/members/:user_id
pub async fn remove_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path((id, member_id)): Path<(String, String)>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let user_id = match parse_user_id(&member_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .service
        .remove_member(caller.user_id(), club_id, user_id)
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "member removed" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// PATCH /clubs/:id/members/:user_id/role
pub async fn change_member_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path((id, member_id)): Path<(String, String)>,
    Json(body): Json<dto::ChangeRoleRequest>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let user_id = match parse_user_id(&member_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .service
        .change_member_role(caller.user_id(), club_id, user_id, body.role)
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "role updated" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /clubs/:id/leave
pub async fn leave_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.leave_club(caller.user_id(), club_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "left club" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /clubs/:id/follow
pub async fn follow_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.follow_club(caller.user_id(), club_id) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "following" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// DELETE /clubs/:id/follow
pub async fn unfollow_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.unfollow_club(caller.user_id(), club_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "unfollowed" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// GET /clubs/:id/me - the caller's standing in this club.
pub async fn my_membership(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let club_id = match parse_club_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.service.membership_summary(caller.user_id(), club_id) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
