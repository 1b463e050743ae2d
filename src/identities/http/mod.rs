use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::debug;

use crate::{
    http_err::{ApiError, ApiResponse, ApiSuccess},
    server::AppState,
};

use super::services::{PasswordResetError, PasswordResetService};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forgot", post(forgot_password))
        .route("/reset", post(reset_password))
}

impl From<PasswordResetError> for ApiError {
    fn from(error: PasswordResetError) -> Self {
        match error {
            PasswordResetError::Invalid(context) => {
                Self::UnprocessableEntity(reps::validation_messages(context))
            }
            PasswordResetError::UserNotFound => Self::NotFound("User not found".to_owned()),
            PasswordResetError::InvalidToken => {
                Self::BadRequest("Token / Data that you input is not valid".to_owned())
            }
            PasswordResetError::AccountNotActivated => Self::BadRequest(
                "Your account is not activated yet. Please check your email to activate your account"
                    .to_owned(),
            ),
            PasswordResetError::Other(error) => error.into(),
        }
    }
}

/// Unwrap a JSON body, treating an unreadable body as one with every field
/// absent so that validation reports what is missing.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(%rejection, "Received unreadable request body.");

            T::default()
        }
    }
}

async fn forgot_password(
    State(password_resets): State<PasswordResetService>,
    payload: Result<Json<reps::ForgotPasswordRequest>, JsonRejection>,
) -> ApiResponse<ApiSuccess<reps::ForgotPasswordResponse>> {
    let request = body_or_default(payload);

    let verification = password_resets.issue_reset_token(request.into()).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        "Forgot Password verification has been sent",
        reps::ForgotPasswordResponse { verification },
    ))
}

async fn reset_password(
    State(password_resets): State<PasswordResetService>,
    payload: Result<Json<reps::ResetPasswordRequest>, JsonRejection>,
) -> ApiResponse<ApiSuccess<()>> {
    let request = body_or_default(payload);

    password_resets.redeem_reset_token(request.into()).await?;

    Ok(ApiSuccess::empty(StatusCode::OK, "Password has been updated"))
}
