use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::models::ConfirmOutcome;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let outcome = state
        .auth_service
        .confirm_email(&token)
        .await
        .map_err(ApiError::from)?;

    let message = match outcome {
        ConfirmOutcome::Confirmed => "Email confirmed",
        ConfirmOutcome::AlreadyConfirmed => "Your email is already confirmed",
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: message.to_string(),
        },
    ))
}
