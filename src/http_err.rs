use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error.";

/// Body of every successful response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRep<T> {
    pub status: &'static str,
    pub message: String,
    pub data: Option<T>,
    pub status_code: u16,
}

/// A successful response wrapped in the standard envelope.
pub struct ApiSuccess<T> {
    status: StatusCode,
    message: String,
    data: Option<T>,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        Self {
            status,
            message: message.to_owned(),
            data: Some(data),
        }
    }
}

impl ApiSuccess<()> {
    /// A success response with a `null` payload.
    pub fn empty(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_owned(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = SuccessRep {
            status: "success",
            message: self.message,
            data: self.data,
            status_code: self.status.as_u16(),
        };

        (self.status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRep {
    pub status: &'static str,
    pub message: String,
    pub status_code: u16,
}

impl ErrorRep {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status: "error",
            message,
            status_code: status.as_u16(),
        }
    }
}

/// A single problem with a request body.
#[derive(Debug, Eq, PartialEq, Serialize)]
pub struct ValidationMessage {
    pub msg: String,
}

impl ValidationMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRep {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationMessage>,
    pub status_code: u16,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnprocessableEntity(Vec<ValidationMessage>),
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorRep::new(StatusCode::BAD_REQUEST, message)),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorRep::new(StatusCode::NOT_FOUND, message)),
            )
                .into_response(),
            Self::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationRep {
                    status: "error",
                    message: "Validation errors",
                    errors,
                    status_code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                }),
            )
                .into_response(),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE.to_owned(),
                )),
            )
                .into_response(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(?error, "Received error.");

        Self::InternalServerError
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;
