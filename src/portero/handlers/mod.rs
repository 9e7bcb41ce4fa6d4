pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod login;
pub use self::login::login;

pub mod logout;
pub use self::logout::logout;

pub mod types;

// common functions for the handlers
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use regex::Regex;
use types::{FieldError, SignupRequest, StatusResponse};

const MIN_PASSWORD_LEN: usize = 8;
const MIN_PHONE_LEN: usize = 7;

/// Normalize an email for lookup/uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Phone numbers keep only a loose shape check: digits with optional
/// `+`, `-` and spaces, at least seven digits overall.
pub fn valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits >= MIN_PHONE_LEN
        && phone
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' '))
}

/// Apply the signup field rules, returning one entry per failing field.
pub fn validate_signup(request: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match request.full_name.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new("fullName", "Full name is required.")),
        Some(_) => {}
    }

    match request.email.as_deref() {
        None => errors.push(FieldError::new("email", "Email is required.")),
        Some(email) if !valid_email(&normalize_email(email)) => {
            errors.push(FieldError::new("email", "Invalid email."));
        }
        Some(_) => {}
    }

    match request.phone.as_deref() {
        None => errors.push(FieldError::new("phone", "Phone is required.")),
        Some(phone) if !valid_phone(phone.trim()) => {
            errors.push(FieldError::new("phone", "Invalid phone number."));
        }
        Some(_) => {}
    }

    match request.password.as_deref() {
        None => errors.push(FieldError::new("password", "Password is required.")),
        Some(password) if password.len() < MIN_PASSWORD_LEN => {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters long.",
            ));
        }
        Some(_) => {}
    }

    errors
}

/// Generic 500 response, the caller logs the underlying error.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusResponse::internal_error()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request(
        full_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        password: Option<&str>,
    ) -> SignupRequest {
        SignupRequest {
            full_name: full_name.map(str::to_string),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@b"));
    }

    #[test]
    fn valid_phone_requires_seven_digits() {
        assert!(valid_phone("+1 555-010-0123"));
        assert!(valid_phone("5550100"));
        assert!(!valid_phone("555"));
        assert!(!valid_phone("phone-number"));
    }

    #[test]
    fn validate_signup_accepts_complete_request() {
        let request = signup_request(
            Some("Alice Doe"),
            Some("alice@example.com"),
            Some("+15550100"),
            Some("correct horse"),
        );
        assert!(validate_signup(&request).is_empty());
    }

    #[test]
    fn validate_signup_reports_every_missing_field() {
        let errors = validate_signup(&signup_request(None, None, None, None));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["fullName", "email", "phone", "password"]);
    }

    #[test]
    fn validate_signup_rejects_short_password() {
        let errors = signup_request(
            Some("Alice Doe"),
            Some("alice@example.com"),
            Some("+15550100"),
            Some("short"),
        );
        let errors = validate_signup(&errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn validate_signup_rejects_blank_full_name() {
        let errors = validate_signup(&signup_request(
            Some("   "),
            Some("alice@example.com"),
            Some("+15550100"),
            Some("correct horse"),
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "fullName");
    }
}
