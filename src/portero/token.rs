//! Session token issuer.
//!
//! Tokens are signed, time-bound JWTs encoding the user id. They are
//! returned in the JSON body for non-browser clients and attached as an
//! HTTP-only cookie. Logout only clears the cookie, there is no server-side
//! revocation, an issued token stays valid until its own expiry.

use super::state::AuthState;
use axum::http::{header::InvalidHeaderValue, HeaderValue};
use jsonwebtoken::{decode, encode, get_current_timestamp, Header, Validation};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE_NAME: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Hex user id.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issue a signed token bound to the given user id.
/// # Errors
/// Return error if signing fails
pub fn issue(auth_state: &AuthState, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + auth_state.token_ttl_seconds(),
    };

    encode(&Header::default(), &claims, auth_state.encoding_key())
}

/// Decode a token back into the user id it was issued for.
/// # Errors
/// Return error if the signature is invalid or the token expired
pub fn verify(auth_state: &AuthState, token: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, auth_state.decoding_key(), &Validation::default())?;
    Ok(data.claims.sub)
}

/// Build the `Set-Cookie` value carrying the session token.
/// # Errors
/// Return error if the token contains characters invalid in a header
pub fn session_cookie(
    auth_state: &AuthState,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = auth_state.token_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={ttl_seconds}"
    );
    if auth_state.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that instructs the client to drop the
/// session cookie. Attributes match the ones used when it was set.
/// # Errors
/// Return error if the value cannot be represented as a header
pub fn clear_session_cookie(auth_state: &AuthState) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if auth_state.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::globals::GlobalArgs;
    use anyhow::Result;
    use secrecy::SecretString;

    fn auth_state(production: bool) -> AuthState {
        let globals = GlobalArgs::new(SecretString::from("test-secret"));
        AuthState::new(&globals, production)
    }

    #[test]
    fn issued_token_round_trips_user_id() -> Result<()> {
        let state = auth_state(false);
        let token = issue(&state, "64f0c63a5f9b0a7b1c8d4e2f")?;
        let sub = verify(&state, &token)?;
        assert_eq!(sub, "64f0c63a5f9b0a7b1c8d4e2f");
        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> Result<()> {
        let state = auth_state(false);
        let other = AuthState::new(&GlobalArgs::new(SecretString::from("other")), false);
        let token = issue(&other, "64f0c63a5f9b0a7b1c8d4e2f")?;
        assert!(verify(&state, &token).is_err());
        Ok(())
    }

    #[test]
    fn garbage_token_is_rejected() {
        let state = auth_state(false);
        assert!(verify(&state, "not-a-token").is_err());
    }

    #[test]
    fn session_cookie_attributes() -> Result<()> {
        let state = auth_state(false);
        let cookie = session_cookie(&state, "abc")?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with("token=abc; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
        Ok(())
    }

    #[test]
    fn session_cookie_secure_in_production() -> Result<()> {
        let state = auth_state(true);
        let cookie = session_cookie(&state, "abc")?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn clear_cookie_expires_immediately() -> Result<()> {
        let state = auth_state(true);
        let cookie = clear_session_cookie(&state)?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with("token=; "));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Secure"));
        Ok(())
    }
}
