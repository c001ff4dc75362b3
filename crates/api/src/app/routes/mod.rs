use axum::{
    Router,
    routing::{get, patch, post},
};

pub mod auth;
pub mod clubs;
pub mod events;
pub mod system;

/// Routes reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
}

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/clubs", get(clubs::list_clubs).post(clubs::create_club))
        .route(
            "/clubs/:id",
            get(clubs::get_club)
                .patch(clubs::update_club)
                .delete(clubs::delete_club),
        )
        .route("/clubs/:id/members", post(clubs::invite_member))
        .route("/clubs/:id/members/:user_id", axum::routing::delete(clubs::remove_member))
        .route(
            "/clubs/:id/members/:user_id/role",
            patch(clubs::change_member_role),
        )
        .route("/clubs/:id/leave", post(clubs::leave_club))
        .route(
            "/clubs/:id/follow",
            post(clubs::follow_club).delete(clubs::unfollow_club),
        )
        .route("/clubs/:id/me", get(clubs::my_membership))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/register", post(events::register))
        .route("/me/events", get(events::my_registrations))
}
