//! HTTP API application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: application service + token signer shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use clubhub_auth::{Hs256JwtValidator, RolePermissionTable};
use clubhub_infra::{AppService, InMemoryStore};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(jwt_secret.into_bytes()));

    let services = Arc::new(services::AppServices {
        service: AppService::new(InMemoryStore::new(), RolePermissionTable::standard()),
        jwt: jwt.clone(),
    });

    let auth_state = middleware::AuthState {
        jwt,
        services: services.clone(),
    };

    // Everything except /health and /auth/* requires a bearer token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
}
