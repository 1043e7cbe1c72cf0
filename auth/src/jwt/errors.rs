use thiserror::Error;

use super::claims::TokenScope;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Invalid scope for token: expected {expected}, got {actual}")]
    ScopeMismatch {
        expected: TokenScope,
        actual: TokenScope,
    },
}
