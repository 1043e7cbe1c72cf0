use std::sync::Arc;

use async_trait::async_trait;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::TokenScope;
use chrono::Duration;
use chrono::Utc;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ConfirmOutcome;
use crate::domain::account::models::ResendOutcome;
use crate::domain::account::models::SignupCommand;
use crate::domain::account::models::TokenPair;
use crate::domain::account::ports::AccountStore;
use crate::domain::account::ports::AuthServicePort;
use crate::domain::account::ports::ConfirmationMailer;
use crate::domain::account::ports::TokenCache;

/// Lifetimes for the three token scopes.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub access: Duration,
    pub refresh: Duration,
    pub email: Duration,
}

impl Default for TokenTtls {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
            email: Duration::days(7),
        }
    }
}

/// Domain service implementing the authentication operations.
///
/// Holds injected configuration and capability references; no ambient
/// globals. Password hashing runs on the blocking pool since its cost is
/// deliberately non-trivial.
pub struct AuthService<S, C, M>
where
    S: AccountStore,
    C: TokenCache,
    M: ConfirmationMailer,
{
    store: Arc<S>,
    token_cache: Arc<C>,
    mailer: Arc<M>,
    password_hasher: Arc<PasswordHasher>,
    jwt: JwtHandler,
    ttls: TokenTtls,
    cache_ttl: Duration,
}

impl<S, C, M> AuthService<S, C, M>
where
    S: AccountStore,
    C: TokenCache,
    M: ConfirmationMailer,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `token_cache` - Resolved-identity cache implementation
    /// * `mailer` - Confirmation mail dispatch implementation
    /// * `secret` - Symmetric token signing secret
    /// * `password_hasher` - Configured password hasher
    /// * `ttls` - Token lifetimes per scope
    /// * `cache_ttl` - Upper bound for cached identity entries
    pub fn new(
        store: Arc<S>,
        token_cache: Arc<C>,
        mailer: Arc<M>,
        secret: &[u8],
        password_hasher: PasswordHasher,
        ttls: TokenTtls,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            token_cache,
            mailer,
            password_hasher: Arc::new(password_hasher),
            jwt: JwtHandler::new(secret),
            ttls,
            cache_ttl,
        }
    }

    /// Mint both tokens and persist the refresh token as the account's sole
    /// session token, replacing any previous one.
    async fn issue_pair(&self, account: &Account) -> Result<TokenPair, AuthError> {
        let email = account.email.as_str();

        let access_token = self
            .jwt
            .mint(email, TokenScope::AccessToken, self.ttls.access)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;
        let refresh_token = self
            .jwt
            .mint(email, TokenScope::RefreshToken, self.ttls.refresh)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;

        self.store
            .update_refresh_token(&account.id, Some(&refresh_token))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Dispatch a confirmation mail; delivery failure is logged, never fatal.
    async fn send_confirmation(&self, account: &Account, token: &str) {
        if let Err(e) = self
            .mailer
            .send_confirmation(account.email.as_str(), account.username.as_str(), token)
            .await
        {
            tracing::error!(
                "Failed to send confirmation email to {}: {}",
                account.email.as_str(),
                e
            );
        }
    }
}

#[async_trait]
impl<S, C, M> AuthServicePort for AuthService<S, C, M>
where
    S: AccountStore,
    C: TokenCache,
    M: ConfirmationMailer,
{
    async fn signup(&self, command: SignupCommand) -> Result<Account, AuthError> {
        if self
            .store
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists(command.email.as_str().to_string()));
        }

        let hasher = Arc::clone(&self.password_hasher);
        let password = command.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unknown(e.to_string()))??;

        let avatar_url = command.email.gravatar_url();
        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            avatar_url: Some(avatar_url),
            confirmed: false,
            refresh_token: None,
            created_at: Utc::now(),
        };

        let account = self.store.save(account).await?;

        let token = self.create_email_token(account.email.as_str())?;
        self.send_confirmation(&account, &token).await;

        Ok(account)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        if !account.confirmed {
            return Err(AuthError::NotConfirmed);
        }

        let hasher = Arc::clone(&self.password_hasher);
        let password = password.to_string();
        let stored_hash = account.password_hash.clone();
        let password_matches =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
                .await
                .map_err(|e| AuthError::Unknown(e.to_string()))?;

        if !password_matches {
            return Err(AuthError::InvalidPassword);
        }

        self.issue_pair(&account).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt
            .decode(refresh_token, TokenScope::RefreshToken)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let account = self
            .store
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("unknown subject".to_string()))?;

        if account.refresh_token.as_deref() != Some(refresh_token) {
            // A superseded or never-issued token is evidence of reuse: drop
            // the stored session so only a fresh login can continue
            self.store.update_refresh_token(&account.id, None).await?;
            return Err(AuthError::SessionRevoked);
        }

        self.issue_pair(&account).await
    }

    async fn current_account(&self, access_token: &str) -> Result<Account, AuthError> {
        if let Some(account) = self.token_cache.get(access_token).await {
            return Ok(account);
        }

        let claims = self
            .jwt
            .decode(access_token, TokenScope::AccessToken)
            .map_err(|_| AuthError::CredentialsRejected)?;

        let account = self
            .store
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::CredentialsRejected)?;

        // Cap the cache entry at the token's own remaining lifetime
        let remaining = Duration::seconds(claims.remaining_lifetime());
        let ttl = std::cmp::min(self.cache_ttl, remaining);
        if ttl > Duration::zero() {
            self.token_cache.put(access_token, &account, ttl).await;
        }

        Ok(account)
    }

    fn create_email_token(&self, email: &str) -> Result<String, AuthError> {
        self.jwt
            .mint(email, TokenScope::EmailToken, self.ttls.email)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))
    }

    async fn confirm_email(&self, token: &str) -> Result<ConfirmOutcome, AuthError> {
        let claims = self
            .jwt
            .decode(token, TokenScope::EmailToken)
            .map_err(|e| AuthError::VerificationFailed(e.to_string()))?;

        let account = self
            .store
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| {
                AuthError::VerificationFailed(format!("unknown account: {}", claims.sub))
            })?;

        if account.confirmed {
            return Ok(ConfirmOutcome::AlreadyConfirmed);
        }

        self.store.set_confirmed(account.email.as_str()).await?;

        Ok(ConfirmOutcome::Confirmed)
    }

    async fn resend_confirmation(&self, email: &str) -> Result<ResendOutcome, AuthError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        if account.confirmed {
            return Ok(ResendOutcome::AlreadyConfirmed);
        }

        let token = self.create_email_token(account.email.as_str())?;
        self.send_confirmation(&account, &token).await;

        Ok(ResendOutcome::Sent)
    }

    async fn update_avatar(&self, email: &str, url: &str) -> Result<Account, AuthError> {
        self.store.set_avatar(email, url).await
    }
}
