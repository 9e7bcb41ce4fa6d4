use crate::{
    cli::globals::GlobalArgs,
    store::{self, users::UserStore},
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, production: bool, globals: &GlobalArgs) -> Result<()> {
    // Startup-only dependency check, an unreachable store is fatal
    let database = store::connect(&dsn).await?;

    let users = UserStore::new(&database);
    users
        .ensure_indexes()
        .await
        .context("Failed to create user indexes")?;

    let auth_state = Arc::new(state::AuthState::new(globals, production));

    let app = router(users, auth_state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Build the application router.
#[must_use]
pub fn router(users: UserStore, auth_state: Arc<state::AuthState>) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi::serve))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(users))
                .layer(Extension(auth_state)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use axum::http::{header::SET_COOKIE, StatusCode};
    use mongodb::Client;
    use secrecy::SecretString;
    use tower::ServiceExt;

    async fn test_router() -> Result<Router> {
        // Lazy client: no running store is needed for routes that reject
        // input before their first store access.
        let client = Client::with_uri_str("mongodb://localhost:27017/portero-test").await?;
        let database = client
            .default_database()
            .context("missing default database")?;
        let globals = GlobalArgs::new(SecretString::from("test-secret"));
        Ok(router(
            UserStore::new(&database),
            Arc::new(state::AuthState::new(&globals, false)),
        ))
    }

    #[tokio::test]
    async fn health_route_responds() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-App"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_route_clears_cookie() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/logout")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .context("missing Set-Cookie")?
            .to_str()?;
        assert!(cookie.contains("Max-Age=0"));
        Ok(())
    }

    #[tokio::test]
    async fn signup_without_body_is_bad_request() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/signup")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_is_served() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
