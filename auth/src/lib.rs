//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure:
//! - Password hashing (Argon2id)
//! - Signed, expiring, scope-tagged token generation and validation
//!
//! Services define their own orchestration on top of these primitives; this
//! crate owns only the cryptographic contracts.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Scoped Tokens
//! ```
//! use auth::{JwtHandler, TokenScope};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler
//!     .mint("user@example.com", TokenScope::AccessToken, Duration::minutes(15))
//!     .unwrap();
//! let claims = handler.decode(&token, TokenScope::AccessToken).unwrap();
//! assert_eq!(claims.sub, "user@example.com");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenScope;
pub use password::PasswordError;
pub use password::PasswordHasher;
