use thiserror::Error;

use auth::PasswordError;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for confirmation-mail dispatch
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to deliver mail: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    // Domain-level outcomes
    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid email")]
    UnknownEmail,

    #[error("Email not confirmed")]
    NotConfirmed,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Single opaque failure for access-token resolution; deliberately does
    /// not say which check failed
    #[error("Could not validate credentials")]
    CredentialsRejected,

    /// Presented refresh token does not match the stored session token; the
    /// stored token has been cleared
    #[error("Invalid refresh token")]
    SessionRevoked,

    #[error("Verification error: {0}")]
    VerificationFailed(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
