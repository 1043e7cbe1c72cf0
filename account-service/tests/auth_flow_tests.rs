mod common;

use account_service::domain::account::errors::AuthError;
use account_service::domain::account::models::ConfirmOutcome;
use account_service::domain::account::models::ResendOutcome;
use account_service::domain::account::ports::AuthServicePort;
use common::TestAuth;

#[tokio::test]
async fn test_signup_confirm_login_flow() {
    let app = TestAuth::new();

    let account = app
        .signup("a@x.com", "alice", "secret1")
        .await
        .expect("Signup failed");
    assert!(!account.confirmed);
    assert!(account.password_hash.starts_with("$argon2"));

    // Before confirmation every login fails on the unconfirmed state,
    // whatever the password
    let result = app.service.login("a@x.com", "wrong").await;
    assert!(matches!(result, Err(AuthError::NotConfirmed)));
    let result = app.service.login("a@x.com", "secret1").await;
    assert!(matches!(result, Err(AuthError::NotConfirmed)));

    assert_eq!(app.confirm("a@x.com").await, ConfirmOutcome::Confirmed);

    // Wrong password now fails on the password itself, distinctly
    let result = app.service.login("a@x.com", "wrong").await;
    assert!(matches!(result, Err(AuthError::InvalidPassword)));

    let pair = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestAuth::new();

    let result = app.service.login("nobody@x.com", "secret1").await;
    assert!(matches!(result, Err(AuthError::UnknownEmail)));
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = TestAuth::new();

    app.signup("a@x.com", "alice", "secret1")
        .await
        .expect("Signup failed");

    let result = app.signup("a@x.com", "alice2", "secret2").await;
    assert!(matches!(result, Err(AuthError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_refresh_rotation_invalidates_previous_token() {
    let app = TestAuth::new();
    app.signup_confirmed("a@x.com", "alice", "secret1").await;

    let first = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");

    let second = app
        .service
        .refresh(&first.refresh_token)
        .await
        .expect("Refresh failed");
    assert_ne!(second.refresh_token, first.refresh_token);

    // The rotated-out token is dead even though it has not expired
    let result = app.service.refresh(&first.refresh_token).await;
    assert!(matches!(result, Err(AuthError::SessionRevoked)));

    // The mismatch cleared the stored session, so the current token dies too
    assert!(app.store.stored("a@x.com").unwrap().refresh_token.is_none());
    let result = app.service.refresh(&second.refresh_token).await;
    assert!(matches!(result, Err(AuthError::SessionRevoked)));
}

#[tokio::test]
async fn test_second_login_supersedes_first_session() {
    let app = TestAuth::new();
    app.signup_confirmed("a@x.com", "alice", "secret1").await;

    let first = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");
    let second = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");
    assert_ne!(first.refresh_token, second.refresh_token);

    // Only the latest login's refresh token is live
    let result = app.service.refresh(&first.refresh_token).await;
    assert!(matches!(result, Err(AuthError::SessionRevoked)));
}

#[tokio::test]
async fn test_confirm_email_is_idempotent() {
    let app = TestAuth::new();

    app.signup("a@x.com", "alice", "secret1")
        .await
        .expect("Signup failed");

    assert_eq!(app.confirm("a@x.com").await, ConfirmOutcome::Confirmed);
    assert_eq!(
        app.confirm("a@x.com").await,
        ConfirmOutcome::AlreadyConfirmed
    );
    assert!(app.store.stored("a@x.com").unwrap().confirmed);
}

#[tokio::test]
async fn test_resend_confirmation_issues_fresh_token() {
    let app = TestAuth::new();

    app.signup("a@x.com", "alice", "secret1")
        .await
        .expect("Signup failed");
    assert_eq!(app.mailer.sent_count(), 1);

    let outcome = app
        .service
        .resend_confirmation("a@x.com")
        .await
        .expect("Resend failed");
    assert_eq!(outcome, ResendOutcome::Sent);
    assert_eq!(app.mailer.sent_count(), 2);

    // The re-sent token confirms the account
    assert_eq!(app.confirm("a@x.com").await, ConfirmOutcome::Confirmed);

    let outcome = app
        .service
        .resend_confirmation("a@x.com")
        .await
        .expect("Resend failed");
    assert_eq!(outcome, ResendOutcome::AlreadyConfirmed);
    assert_eq!(app.mailer.sent_count(), 2);
}

#[tokio::test]
async fn test_current_account_is_served_from_cache() {
    let app = TestAuth::new();
    app.signup_confirmed("a@x.com", "alice", "secret1").await;

    let pair = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");

    let before = app.store.lookup_count();
    let account = app
        .service
        .current_account(&pair.access_token)
        .await
        .expect("Resolution failed");
    assert_eq!(account.email.as_str(), "a@x.com");
    assert_eq!(app.store.lookup_count(), before + 1);

    // Second resolution hits the cache, not the store
    app.service
        .current_account(&pair.access_token)
        .await
        .expect("Resolution failed");
    assert_eq!(app.store.lookup_count(), before + 1);
}

#[tokio::test]
async fn test_current_account_rejects_refresh_token() {
    let app = TestAuth::new();
    app.signup_confirmed("a@x.com", "alice", "secret1").await;

    let pair = app
        .service
        .login("a@x.com", "secret1")
        .await
        .expect("Login failed");

    let result = app.service.current_account(&pair.refresh_token).await;
    assert!(matches!(result, Err(AuthError::CredentialsRejected)));
}

#[tokio::test]
async fn test_update_avatar() {
    let app = TestAuth::new();
    app.signup_confirmed("a@x.com", "alice", "secret1").await;

    let account = app
        .service
        .update_avatar("a@x.com", "https://cdn.example.com/alice.png")
        .await
        .expect("Avatar update failed");
    assert_eq!(
        account.avatar_url.as_deref(),
        Some("https://cdn.example.com/alice.png")
    );
}
