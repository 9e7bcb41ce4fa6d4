//! Shared auth state: token signing keys and cookie policy.

use crate::cli::globals::GlobalArgs;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;

/// Session token lifetime, also used as the cookie `Max-Age`.
const TOKEN_TTL_SECONDS: u64 = 60 * 60 * 24 * 7;

pub struct AuthState {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_seconds: u64,
    production: bool,
}

impl AuthState {
    #[must_use]
    pub fn new(globals: &GlobalArgs, production: bool) -> Self {
        let secret = globals.token_secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl_seconds: TOKEN_TTL_SECONDS,
            production,
        }
    }

    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    #[must_use]
    pub const fn token_ttl_seconds(&self) -> u64 {
        self.token_ttl_seconds
    }

    /// Cookies are only marked `Secure` in production mode.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.production
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("production", &self.production)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn cookie_secure_follows_production_flag() {
        let globals = GlobalArgs::new(SecretString::from("sekret"));
        assert!(!AuthState::new(&globals, false).cookie_secure());
        assert!(AuthState::new(&globals, true).cookie_secure());
    }
}
