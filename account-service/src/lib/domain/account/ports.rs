use async_trait::async_trait;
use chrono::Duration;

use crate::domain::account::errors::AuthError;
use crate::domain::account::errors::MailerError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ConfirmOutcome;
use crate::domain::account::models::ResendOutcome;
use crate::domain::account::models::SignupCommand;
use crate::domain::account::models::TokenPair;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new unconfirmed account and dispatch a confirmation mail.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `Database` - Store operation failed
    async fn signup(&self, command: SignupCommand) -> Result<Account, AuthError>;

    /// Verify credentials and mint an access/refresh pair.
    ///
    /// The minted refresh token becomes the account's sole session token,
    /// overwriting any previous one.
    ///
    /// # Errors
    /// * `UnknownEmail` - No account with this email
    /// * `NotConfirmed` - Account email not yet confirmed
    /// * `InvalidPassword` - Password does not match
    /// * `Database` - Store operation failed
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a fresh pair, rotating the stored one.
    ///
    /// A mismatch between the presented token and the stored session token
    /// clears the stored token before failing, so the session cannot be
    /// refreshed again without a new login.
    ///
    /// # Errors
    /// * `InvalidToken` - Token invalid, expired, wrong scope, or unknown subject
    /// * `SessionRevoked` - Token does not match the stored session token
    /// * `Database` - Store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Resolve the account an access token belongs to.
    ///
    /// # Errors
    /// * `CredentialsRejected` - Any token or subject failure, collapsed
    /// * `Database` - Store operation failed
    async fn current_account(&self, access_token: &str) -> Result<Account, AuthError>;

    /// Mint an email-confirmation token for `email`. Stateless; verified
    /// purely by signature and expiry.
    fn create_email_token(&self, email: &str) -> Result<String, AuthError>;

    /// Confirm the account named by an email-confirmation token.
    ///
    /// Idempotent: an already-confirmed account yields `AlreadyConfirmed`
    /// without mutation.
    ///
    /// # Errors
    /// * `VerificationFailed` - Bad token or unknown subject
    /// * `Database` - Store operation failed
    async fn confirm_email(&self, token: &str) -> Result<ConfirmOutcome, AuthError>;

    /// Mail a fresh confirmation token to an unconfirmed account.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `Database` - Store operation failed
    async fn resend_confirmation(&self, email: &str) -> Result<ResendOutcome, AuthError>;

    /// Record a new avatar URL for the account.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `Database` - Store operation failed
    async fn update_avatar(&self, email: &str, url: &str) -> Result<Account, AuthError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Retrieve account by email address.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Database` - Store operation failed
    async fn save(&self, account: Account) -> Result<Account, AuthError>;

    /// Overwrite the account's session token; `None` clears it.
    ///
    /// This single-row update is the serialization point for concurrent
    /// logins and refreshes: last write wins.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Store operation failed
    async fn update_refresh_token(
        &self,
        id: &AccountId,
        token: Option<&str>,
    ) -> Result<(), AuthError>;

    /// Mark the account's email as confirmed. Never reversed.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Store operation failed
    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError>;

    /// Record a new avatar URL.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Store operation failed
    async fn set_avatar(&self, email: &str, url: &str) -> Result<Account, AuthError>;
}

/// Read-through cache of resolved identity, keyed by raw access token.
///
/// Purely an acceleration layer: a miss (or a broken cache) always falls
/// back to full decode and lookup, never the other way around.
#[async_trait]
pub trait TokenCache: Send + Sync + 'static {
    /// Look up a previously resolved account for this token.
    async fn get(&self, access_token: &str) -> Option<Account>;

    /// Cache a resolved account for this token.
    ///
    /// Callers bound `ttl` by the token's own remaining lifetime so no entry
    /// outlives its token.
    async fn put(&self, access_token: &str, account: &Account, ttl: Duration);
}

/// Outbound dispatch of confirmation mail.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync + 'static {
    /// Send a confirmation mail carrying the verification token.
    ///
    /// # Errors
    /// * `DeliveryFailed` - Mail could not be handed off
    async fn send_confirmation(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError>;
}
