//! Logout endpoint.

use super::types::StatusResponse;
use crate::portero::{state::AuthState, token};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = StatusResponse),
        (status = 500, description = "Internal error", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Stateless: the cookie is cleared client-side, issued tokens stay valid
    // until their own expiry. Always succeeds, session or not.
    let mut headers = HeaderMap::new();
    match token::clear_session_cookie(&auth_state) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build clear cookie: {err:?}");
            return super::internal_error();
        }
    }

    (
        StatusCode::OK,
        headers,
        Json(StatusResponse::success("Logged out successfully.")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::globals::GlobalArgs;
    use anyhow::{Context, Result};
    use axum::body::to_bytes;
    use secrecy::SecretString;
    use serde_json::Value;

    #[tokio::test]
    async fn logout_clears_cookie_and_succeeds() -> Result<()> {
        let globals = GlobalArgs::new(SecretString::from("test-secret"));
        let auth_state = Extension(Arc::new(AuthState::new(&globals, false)));

        let response = logout(auth_state).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .context("missing Set-Cookie")?
            .to_str()?
            .to_string();
        assert!(cookie.starts_with("token=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body.get("status").and_then(Value::as_str), Some("success"));
        Ok(())
    }
}
