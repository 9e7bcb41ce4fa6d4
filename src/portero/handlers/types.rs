//! Request/response types for the auth endpoints.
//!
//! Every response uses the same envelope: `status` is one of
//! `success | fail | error`, plus `message`, `user`, `token` or `errors`
//! depending on the outcome.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signup payload. Fields are optional at the serde level so missing ones
/// surface as per-field validation errors instead of a deserialize failure.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// One failed validation rule.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// 422 envelope listing every failing field.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidationResponse {
    pub status: String,
    pub errors: Vec<FieldError>,
}

impl ValidationResponse {
    #[must_use]
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self {
            status: "fail".to_string(),
            errors,
        }
    }
}

/// Envelope for outcomes that carry only a message.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    #[must_use]
    pub fn success(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn fail(message: &str) -> Self {
        Self {
            status: "fail".to_string(),
            message: message.to_string(),
        }
    }

    /// Generic 500 body. Underlying detail is logged server-side only and
    /// never leaks to the caller.
    #[must_use]
    pub fn internal_error() -> Self {
        Self {
            status: "error".to_string(),
            message: "Internal server error. Please try again later.".to_string(),
        }
    }
}

/// Non-sensitive user fields echoed back to the client.
/// The password hash is never part of a response.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Success envelope for signup and login.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}
