use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenScope;
use super::errors::JwtError;

/// Token handler for minting and validating scoped tokens.
///
/// Uses HS256 (HMAC with SHA-256). The output is URL-safe base64 and is valid
/// both in an `Authorization: Bearer` header and in a URL path segment.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new handler with a symmetric secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Mint a signed token for `subject` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token serialization or signing failed
    pub fn mint(
        &self,
        subject: &str,
        scope: TokenScope,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, scope, ttl);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// The signature check is an unconditional first gate: claims are only
    /// deserialized from a payload whose signature verified. Expiry is then
    /// checked with zero leeway, and finally the scope tag must equal
    /// `expected_scope`.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiration time
    /// * `ScopeMismatch` - Token was minted for a different purpose
    /// * `DecodingFailed` - Signature is invalid or the token is malformed
    pub fn decode(&self, token: &str, expected_scope: TokenScope) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::DecodingFailed(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.scope != expected_scope {
            return Err(JwtError::ScopeMismatch {
                expected: expected_scope,
                actual: claims.scope,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_mint_and_decode() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .mint("a@x.com", TokenScope::AccessToken, Duration::minutes(15))
            .expect("Failed to mint token");
        assert!(!token.is_empty());

        let claims = handler
            .decode(&token, TokenScope::AccessToken)
            .expect("Failed to decode token");
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.scope, TokenScope::AccessToken);
    }

    #[test]
    fn test_token_is_url_safe() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .mint("a@x.com", TokenScope::EmailToken, Duration::days(7))
            .expect("Failed to mint token");

        // base64url plus the JWT segment separator
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET);

        let result = handler.decode("invalid.token.here", TokenScope::AccessToken);
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = handler1
            .mint("a@x.com", TokenScope::AccessToken, Duration::minutes(15))
            .expect("Failed to mint token");

        let result = handler2.decode(&token, TokenScope::AccessToken);
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .mint("a@x.com", TokenScope::AccessToken, Duration::seconds(-5))
            .expect("Failed to mint token");

        let result = handler.decode(&token, TokenScope::AccessToken);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_scope_isolation() {
        let handler = JwtHandler::new(SECRET);

        let refresh = handler
            .mint("a@x.com", TokenScope::RefreshToken, Duration::days(7))
            .expect("Failed to mint token");
        let access = handler
            .mint("a@x.com", TokenScope::AccessToken, Duration::minutes(15))
            .expect("Failed to mint token");

        assert!(matches!(
            handler.decode(&refresh, TokenScope::AccessToken),
            Err(JwtError::ScopeMismatch {
                expected: TokenScope::AccessToken,
                actual: TokenScope::RefreshToken,
            })
        ));
        assert!(matches!(
            handler.decode(&access, TokenScope::RefreshToken),
            Err(JwtError::ScopeMismatch {
                expected: TokenScope::RefreshToken,
                actual: TokenScope::AccessToken,
            })
        ));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .mint("a@x.com", TokenScope::AccessToken, Duration::minutes(15))
            .expect("Failed to mint token");

        // Flip one character in the payload segment
        let mid = token.len() / 2;
        let mut tampered: Vec<char> = token.chars().collect();
        tampered[mid] = if tampered[mid] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        let result = handler.decode(&tampered, TokenScope::AccessToken);
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }
}
