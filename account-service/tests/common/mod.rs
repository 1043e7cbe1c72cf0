use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AuthError;
use account_service::domain::account::errors::MailerError;
use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::ConfirmOutcome;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::models::SignupCommand;
use account_service::domain::account::models::Username;
use account_service::domain::account::ports::AccountStore;
use account_service::domain::account::ports::AuthServicePort;
use account_service::domain::account::ports::ConfirmationMailer;
use account_service::domain::account::service::AuthService;
use account_service::domain::account::service::TokenTtls;
use account_service::outbound::cache::InMemoryTokenCache;
use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Duration;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Hermetic account store backed by a HashMap, keyed by email.
///
/// Counts lookups so tests can observe whether the token cache was used.
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
    lookups: AtomicUsize,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of find_by_email calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Direct inspection of the stored account, bypassing the service.
    pub fn stored(&self, email: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(email).cloned())
    }

    async fn save(&self, account: Account) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let email = account.email.as_str().to_string();
        if accounts.contains_key(&email) {
            return Err(AuthError::AlreadyExists(email));
        }
        accounts.insert(email, account.clone());
        Ok(account)
    }

    async fn update_refresh_token(
        &self,
        id: &AccountId,
        token: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|account| account.id == *id)
            .ok_or_else(|| AuthError::NotFound(id.to_string()))?;
        account.refresh_token = token.map(|t| t.to_string());
        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;
        account.confirmed = true;
        Ok(())
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;
        account.avatar_url = Some(url.to_string());
        Ok(account.clone())
    }
}

/// Sent confirmation mail captured for inspection.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub email: String,
    pub username: String,
    pub token: String,
}

/// Mailer that records every dispatch instead of delivering.
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Most recent confirmation token mailed to this address.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|mail| mail.email == email)
            .map(|mail| mail.token.clone())
    }
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send_confirmation(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(SentMail {
            email: email.to_string(),
            username: username.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

/// Auth service wired against in-memory collaborators.
pub struct TestAuth {
    pub service: AuthService<InMemoryAccountStore, InMemoryTokenCache, RecordingMailer>,
    pub store: Arc<InMemoryAccountStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestAuth {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let cache = Arc::new(InMemoryTokenCache::new());
        let mailer = Arc::new(RecordingMailer::new());

        let service = AuthService::new(
            Arc::clone(&store),
            cache,
            Arc::clone(&mailer),
            TEST_SECRET,
            // Minimal work factor to keep tests fast
            PasswordHasher::with_params(8, 1, 1).unwrap(),
            TokenTtls::default(),
            Duration::seconds(300),
        );

        Self {
            service,
            store,
            mailer,
        }
    }

    pub async fn signup(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let command = SignupCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            password.to_string(),
        );
        self.service.signup(command).await
    }

    /// Confirm the account using the token from its confirmation mail.
    pub async fn confirm(&self, email: &str) -> ConfirmOutcome {
        let token = self
            .mailer
            .last_token_for(email)
            .expect("No confirmation mail recorded");
        self.service
            .confirm_email(&token)
            .await
            .expect("Confirmation failed")
    }

    pub async fn signup_confirmed(&self, email: &str, username: &str, password: &str) {
        self.signup(email, username, password)
            .await
            .expect("Signup failed");
        self.confirm(email).await;
    }
}
