use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::models::ResendOutcome;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn request_email(
    State(state): State<AppState>,
    Json(body): Json<RequestEmailBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let outcome = state
        .auth_service
        .resend_confirmation(&body.email)
        .await
        .map_err(ApiError::from)?;

    let message = match outcome {
        ResendOutcome::Sent => "Check your email for confirmation.",
        ResendOutcome::AlreadyConfirmed => "Your email is already confirmed",
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: message.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestEmailBody {
    email: String,
}
