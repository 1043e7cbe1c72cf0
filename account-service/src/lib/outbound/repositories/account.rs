use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountStore;

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, avatar_url, confirmed, refresh_token, created_at";

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn database_error(e: sqlx::Error) -> AuthError {
        AuthError::Database(e.to_string())
    }

    fn account_from_row(row: &PgRow) -> Result<Account, AuthError> {
        let username: String = row.try_get("username").map_err(Self::database_error)?;
        let email: String = row.try_get("email").map_err(Self::database_error)?;

        Ok(Account {
            id: AccountId(row.try_get("id").map_err(Self::database_error)?),
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password_hash: row.try_get("password_hash").map_err(Self::database_error)?,
            avatar_url: row.try_get("avatar_url").map_err(Self::database_error)?,
            confirmed: row.try_get("confirmed").map_err(Self::database_error)?,
            refresh_token: row.try_get("refresh_token").map_err(Self::database_error)?,
            created_at: row.try_get("created_at").map_err(Self::database_error)?,
        })
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::database_error)?;

        row.as_ref().map(Self::account_from_row).transpose()
    }

    async fn save(&self, account: Account) -> Result<Account, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, avatar_url, confirmed, refresh_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(&account.avatar_url)
        .bind(account.confirmed)
        .bind(&account.refresh_token)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("accounts_email_key")
                {
                    return AuthError::AlreadyExists(account.email.as_str().to_string());
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(account)
    }

    async fn update_refresh_token(
        &self,
        id: &AccountId,
        token: Option<&str>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE accounts SET refresh_token = $2 WHERE id = $1")
            .bind(id.0)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(Self::database_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE accounts SET confirmed = TRUE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(Self::database_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(email.to_string()));
        }

        Ok(())
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<Account, AuthError> {
        let row = sqlx::query(&format!(
            "UPDATE accounts SET avatar_url = $2 WHERE email = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::database_error)?;

        match row {
            Some(row) => Self::account_from_row(&row),
            None => Err(AuthError::NotFound(email.to_string())),
        }
    }
}
