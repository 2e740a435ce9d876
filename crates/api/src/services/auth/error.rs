//! Authentication and registration errors.

use thiserror::Error;

use foodie_eats_core::{EmailError, UsernameError};

use crate::db::RepositoryError;

/// Errors from registration, login, and token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email failed validation at signup.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Username failed validation at signup.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Wrong email/password combination.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username or email already registered.
    #[error("account already exists")]
    AlreadyExists,

    /// Password rejected by the strength policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// No bearer token on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// Token not found in the session store.
    #[error("invalid token")]
    InvalidToken,

    /// Token found but past its expiry.
    #[error("token expired")]
    ExpiredToken,

    /// Session or account store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Argon2 hashing failed.
    #[error("password hashing failed")]
    PasswordHash,
}
