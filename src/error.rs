// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;
use crate::services::upstream::UpstreamError;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The AI service is temporarily unavailable. Please try again later.";
pub const FAILED_MESSAGE: &str = "Failed to get a response from the AI service.";

/// Everything a handler can fail with. The display text is what the
/// caller sees; upstream details are logged before conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable,

    #[error("{}", FAILED_MESSAGE)]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unavailable | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::RateLimited => AppError::RateLimited,
            UpstreamError::Unavailable { .. } | UpstreamError::Transport(_) => {
                AppError::Unavailable
            }
            UpstreamError::NotConfigured
            | UpstreamError::Rejected { .. }
            | UpstreamError::Reported(_)
            | UpstreamError::Decode(_)
            | UpstreamError::TooLarge { .. }
            | UpstreamError::EmptyReply => AppError::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ChatResponse::failure(self.to_string()))).into_response()
    }
}
