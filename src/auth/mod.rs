//! Account registration, login and bearer sessions.
//!
//! The owner key of every process record is the account's normalized
//! e-mail address.

pub mod password;
pub mod session;

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::db::{self, DatabaseError};

pub use session::SessionStore;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Built-in accounts accepted when demo logins are enabled.
pub const DEMO_ACCOUNTS: &[(&str, &str)] = &[
    ("test@smartflowai.com", "test123"),
    ("test@smartflow.pl", "test123456"),
];

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid e-mail address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {MIN_PASSWORD_CHARS} characters")]
    PasswordTooShort,

    #[error("Account already exists")]
    AlreadyRegistered,

    #[error("Invalid e-mail or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account. Returns the owner key (normalized e-mail).
pub fn register(
    conn: &Connection,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(AuthError::InvalidEmail);
    }
    if password != confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }

    let hash = password::hash_password(password);
    match db::insert_user(conn, &email, &hash) {
        Ok(()) => {}
        Err(DatabaseError::ConstraintViolation(_)) => return Err(AuthError::AlreadyRegistered),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(email = %email, "Account registered");
    Ok(email)
}

/// Check credentials against stored accounts, then the demo table.
/// Returns the owner key on success.
pub fn authenticate(
    conn: &Connection,
    email: &str,
    password: &str,
    demo_enabled: bool,
) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    if let Some(stored) = db::get_password_hash(conn, &email)? {
        if password::verify_password(password, &stored) {
            return Ok(email);
        }
    }

    if demo_enabled && is_demo_login(&email, password) {
        tracing::info!(email = %email, "Demo account login");
        return Ok(email);
    }

    tracing::warn!(email = %email, "Rejected login");
    Err(AuthError::InvalidCredentials)
}

fn is_demo_login(email: &str, password: &str) -> bool {
    DEMO_ACCOUNTS.iter().any(|(demo_email, demo_password)| {
        *demo_email == email && bool::from(demo_password.as_bytes().ct_eq(password.as_bytes()))
    })
}
