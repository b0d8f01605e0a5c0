//! Error responses of the HTTP API.
//!
//! Every failure is rendered as `{"error": message}` with a status that tells
//! the client whose fault it was.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::discovery::DiscoveryError;
use crate::settings::SettingsError;
use crate::transition::TransitionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request itself was unusable
    #[error("{0}")]
    BadRequest(String),

    /// No authenticated catalog client is available
    #[error("authentication_failed")]
    AuthenticationFailed,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// JSON request body whose rejections render as [`ApiError::BadRequest`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        if err.is_input_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::MissingTrackId => Self::BadRequest(err.to_string()),
            SettingsError::Database(_) => Self::Internal(err.to_string()),
        }
    }
}
