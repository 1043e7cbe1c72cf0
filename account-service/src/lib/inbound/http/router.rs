use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::confirm_email::confirm_email;
use super::handlers::login::login;
use super::handlers::profile::profile;
use super::handlers::refresh_token::refresh_token;
use super::handlers::request_email::request_email;
use super::handlers::signup::signup;
use super::handlers::update_avatar::update_avatar;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::service::AuthService;
use crate::outbound::cache::InMemoryTokenCache;
use crate::outbound::email::LogMailer;
use crate::outbound::repositories::account::PostgresAccountStore;

#[derive(Clone)]
pub struct AppState {
    pub auth_service:
        Arc<AuthService<PostgresAccountStore, InMemoryTokenCache, LogMailer>>,
}

pub fn create_router(
    auth_service: Arc<AuthService<PostgresAccountStore, InMemoryTokenCache, LogMailer>>,
) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh_token", get(refresh_token))
        .route("/api/auth/confirmed_email/:token", get(confirm_email))
        .route("/api/auth/request_email", post(request_email));

    let protected_routes = Router::new()
        .route("/api/accounts/profile", get(profile))
        .route("/api/accounts/avatar", patch(update_avatar))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
