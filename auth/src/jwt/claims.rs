use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Purpose tag embedded in every token.
///
/// Each scope is accepted at exactly one validation site; a token minted for
/// one purpose never validates where another is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    /// Short-lived credential for per-request identity resolution
    AccessToken,
    /// Long-lived credential exchanged for a new token pair
    RefreshToken,
    /// Single-purpose credential carried in email-confirmation links
    EmailToken,
}

impl TokenScope {
    /// Wire tag for this scope, as it appears in the token payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::AccessToken => "access_token",
            TokenScope::RefreshToken => "refresh_token",
            TokenScope::EmailToken => "email_token",
        }
    }
}

impl std::fmt::Display for TokenScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set carried inside a signed token.
///
/// Immutable once minted; only the signed string leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Purpose tag restricting which operation may accept this token
    pub scope: TokenScope,

    /// Unique token identifier; keeps same-second mints distinct
    pub jti: Uuid,
}

impl Claims {
    /// Create a claim set expiring `ttl` from now.
    pub fn new(subject: impl Into<String>, scope: TokenScope, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            scope,
            jti: Uuid::new_v4(),
        }
    }

    /// Seconds until this claim set expires; non-positive once expired.
    pub fn remaining_lifetime(&self) -> i64 {
        self.exp - Utc::now().timestamp()
    }
}
