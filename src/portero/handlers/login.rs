//! Login endpoint.

use super::{
    internal_error, normalize_email,
    types::{AuthResponse, LoginRequest, StatusResponse, UserResponse},
};
use crate::{
    portero::{state::AuthState, token},
    store::users::UserStore,
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

/// The one 401 body for both unknown email and wrong password. Keeping the
/// responses byte-identical prevents account enumeration.
fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(StatusResponse::fail("Invalid email or password.")),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing payload or fields", body = StatusResponse),
        (status = 401, description = "Invalid credentials", body = StatusResponse),
        (status = 500, description = "Internal error", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    users: Extension<UserStore>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse::fail("Missing payload")),
            )
                .into_response()
        }
    };

    // Both fields are required before any store access
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::fail("Email and password are required.")),
        )
            .into_response();
    };
    if email.trim().is_empty() || password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::fail("Email and password are required.")),
        )
            .into_response();
    }

    let email = normalize_email(&email);

    let user = match users.find_by_email(&email).await {
        Ok(Some(user)) => user,
        // Unknown email answers exactly like a wrong password
        Ok(None) => return invalid_credentials(),
        Err(err) => {
            error!("Login lookup failed: {err:?}");
            return internal_error();
        }
    };

    let stored_hash = user.password.clone();
    let verified =
        match tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored_hash)).await {
            Ok(Ok(verified)) => verified,
            Ok(Err(err)) => {
                error!("Password verify failed: {err:?}");
                return internal_error();
            }
            Err(err) => {
                error!("Password verify task failed: {err:?}");
                return internal_error();
            }
        };

    if !verified {
        return invalid_credentials();
    }

    let Some(user_id) = user.id else {
        error!("Persisted user is missing its id");
        return internal_error();
    };

    let token = match token::issue(&auth_state, &user_id.to_hex()) {
        Ok(token) => token,
        Err(err) => {
            error!("Token issue failed: {err:?}");
            return internal_error();
        }
    };

    let mut headers = HeaderMap::new();
    if let Ok(cookie) = token::session_cookie(&auth_state, &token) {
        headers.insert(SET_COOKIE, cookie);
    }

    let response = AuthResponse {
        status: "success".to_string(),
        message: "Logged in successfully.".to_string(),
        user: UserResponse {
            id: user_id.to_hex(),
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
        },
        token,
    };

    (StatusCode::OK, headers, Json(response)).into_response()
}
