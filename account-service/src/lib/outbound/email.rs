use async_trait::async_trait;

use crate::domain::account::errors::MailerError;
use crate::domain::account::ports::ConfirmationMailer;

/// Confirmation mailer that writes the confirmation link to the log.
///
/// Actual mail delivery is an external concern; this adapter makes the
/// confirmation flow usable in development and keeps the dispatch seam in
/// place for a real transport.
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    /// Create a mailer building links against the given public base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_confirmation(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        tracing::info!(
            email,
            username,
            link = %format!("{}/api/auth/confirmed_email/{}", self.base_url, token),
            "Confirmation email queued"
        );

        Ok(())
    }
}
