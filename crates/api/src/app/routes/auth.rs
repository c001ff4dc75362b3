use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};

use clubhub_auth::JwtClaims;
use clubhub_users::NewUser;

use crate::app::{dto, errors, services::AppServices};

const TOKEN_TTL_HOURS: i64 = 24;

/// POST /auth/signup
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignupRequest>,
) -> axum::response::Response {
    if body.password.len() < 8 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password must be at least 8 characters",
        );
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = match Argon2::default().hash_password(body.password.as_bytes(), &salt) {
        Ok(hash) => hash.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "could not process credentials",
            );
        }
    };

    let result = services.service.register_user(NewUser {
        fullname: body.fullname,
        email: body.email,
        password_hash,
        avatar: body.avatar,
    });

    match result {
        Ok(user) => {
            (StatusCode::CREATED, Json(dto::UserResponse::from(user))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// POST /auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // One generic rejection for unknown email and wrong password alike, so
    // the endpoint does not leak which emails exist.
    let rejection = || {
        errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "email or password is incorrect",
        )
    };

    let user = match services.service.user_by_email(&body.email) {
        Ok(Some(user)) => user,
        Ok(None) => return rejection(),
        Err(e) => return errors::service_error_to_response(e),
    };

    let parsed = match PasswordHash::new(&user.password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash is unparseable");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "could not process credentials",
            );
        }
    };
    if Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed)
        .is_err()
    {
        return rejection();
    }

    let now = Utc::now();
    let claims = JwtClaims {
        sub: user.id,
        issued_at: now,
        expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
    };
    let token = match services.jwt.issue(&claims) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "could not issue token",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "user": dto::UserResponse::from(user),
        })),
    )
        .into_response()
}
