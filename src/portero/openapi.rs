//! OpenAPI document for the auth endpoints, served as plain JSON.

use super::handlers::{
    health, login, logout, signup,
    types::{
        AuthResponse, FieldError, LoginRequest, SignupRequest, StatusResponse, UserResponse,
        ValidationResponse,
    },
};
use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "portero",
        description = "Minimal authentication backend: signup, login, logout"
    ),
    paths(
        signup::signup,
        login::login,
        logout::logout,
        health::health
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        StatusResponse,
        ValidationResponse,
        FieldError
    )),
    tags(
        (name = "auth", description = "Signup, login and logout"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

// axum handler for the OpenAPI document
pub async fn serve() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_auth_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/api/v1/auth/signup"));
        assert!(paths.contains_key("/api/v1/auth/login"));
        assert!(paths.contains_key("/api/v1/auth/logout"));
        assert!(paths.contains_key("/health"));
    }
}
