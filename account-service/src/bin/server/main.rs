use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::service::AuthService;
use account_service::domain::account::service::TokenTtls;
use account_service::inbound::http::router::create_router;
use account_service::outbound::cache::InMemoryTokenCache;
use account_service::outbound::email::LogMailer;
use account_service::outbound::repositories::PostgresAccountStore;
use auth::PasswordHasher;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        access_ttl_minutes = config.auth.access_ttl_minutes,
        refresh_ttl_days = config.auth.refresh_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = match &config.auth.argon2 {
        Some(params) => PasswordHasher::with_params(params.m_cost, params.t_cost, params.p_cost)
            .map_err(|e| anyhow::anyhow!("Invalid argon2 configuration: {}", e))?,
        None => PasswordHasher::new(),
    };

    let ttls = TokenTtls {
        access: Duration::minutes(config.auth.access_ttl_minutes),
        refresh: Duration::days(config.auth.refresh_ttl_days),
        email: Duration::days(config.auth.email_ttl_days),
    };

    let account_store = Arc::new(PostgresAccountStore::new(pg_pool));
    let token_cache = Arc::new(InMemoryTokenCache::new());
    let mailer = Arc::new(LogMailer::new(config.mail.base_url.clone()));

    let auth_service = Arc::new(AuthService::new(
        account_store,
        token_cache,
        mailer,
        config.auth.secret.as_bytes(),
        password_hasher,
        ttls,
        Duration::seconds(config.auth.cache_ttl_seconds),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
