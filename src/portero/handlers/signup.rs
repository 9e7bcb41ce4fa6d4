//! Signup endpoint.

use super::{
    internal_error, normalize_email,
    types::{AuthResponse, SignupRequest, StatusResponse, UserResponse, ValidationResponse},
    validate_signup,
};
use crate::{
    portero::{state::AuthState, token},
    store::users::{is_document_validation, is_duplicate_key, UserDocument, UserStore},
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Fixed bcrypt work factor.
const HASH_COST: u32 = 12;

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Missing payload or invalid input data", body = StatusResponse),
        (status = 409, description = "User with the given email and phone already exists", body = StatusResponse),
        (status = 422, description = "Field validation failed", body = ValidationResponse),
        (status = 500, description = "Internal error", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    users: Extension<UserStore>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse::fail("Missing payload")),
            )
                .into_response()
        }
    };

    // Field rules run before any store access
    let errors = validate_signup(&request);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationResponse::new(errors)),
        )
            .into_response();
    }

    // Validation guarantees presence of all four fields
    let (Some(full_name), Some(email), Some(phone), Some(password)) = (
        request.full_name,
        request.email,
        request.phone,
        request.password,
    ) else {
        return internal_error();
    };

    let full_name = full_name.trim().to_string();
    let email = normalize_email(&email);
    let phone = phone.trim().to_string();

    // Duplicate pre-check. The unique indexes still win the race between
    // concurrent signups, the loser is mapped to the same conflict below.
    match users.find_by_email_and_phone(&email, &phone).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(StatusResponse::fail("User already exists.")),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(err) => {
            error!("Signup duplicate check failed: {err:?}");
            return internal_error();
        }
    }

    // bcrypt is CPU-bound, hash on the blocking pool
    let hashed_password =
        match tokio::task::spawn_blocking(move || bcrypt::hash(&password, HASH_COST)).await {
            Ok(Ok(hash)) => hash,
            Ok(Err(err)) => {
                error!("Password hash failed: {err:?}");
                return internal_error();
            }
            Err(err) => {
                error!("Password hash task failed: {err:?}");
                return internal_error();
            }
        };

    let user = UserDocument::new(full_name, email, phone, hashed_password);

    let user_id = match users.insert(&user).await {
        Ok(id) => id,
        Err(err) if is_duplicate_key(&err) => {
            // Lost the check-then-create race, same outcome as the pre-check
            debug!("Unique index rejected signup: {err:?}");
            return (
                StatusCode::CONFLICT,
                Json(StatusResponse::fail("User already exists.")),
            )
                .into_response();
        }
        Err(err) if is_document_validation(&err) => {
            error!("Signup document rejected by store: {err:?}");
            return (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse::fail("Invalid input data.")),
            )
                .into_response();
        }
        Err(err) => {
            error!("Signup insert failed: {err:?}");
            return internal_error();
        }
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
        message: "User created successfully.".to_string(),
        user: UserResponse {
            id: user_id.to_hex(),
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
        },
        token,
    };

    (StatusCode::CREATED, headers, Json(response)).into_response()
}
