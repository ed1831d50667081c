use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lettre::address::AddressError;
use redis::RedisError;
use thiserror::Error;

use crate::models::MessageBody;

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required.";
pub const MALFORMED_PAYLOAD_MESSAGE: &str = "Malformed payload";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Error submitting form. Email not sent.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingFields(&'static str),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Record not saved: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Record saved but email not sent: {0}")]
    Delivery(#[from] DeliveryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) | AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text returned to the caller. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingFields(_) => MISSING_FIELDS_MESSAGE,
            AppError::MalformedPayload(_) => MALFORMED_PAYLOAD_MESSAGE,
            AppError::Persistence(_) | AppError::Delivery(_) => SUBMISSION_FAILED_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageBody::new(self.public_message()))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid mailbox: {0}")]
    Address(#[from] AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Anything that stops the server from coming up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Record store unavailable: {0}")]
    Store(#[from] RedisError),

    #[error("Mail transport misconfigured: {0}")]
    Mail(#[from] DeliveryError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(error: AppError) -> (StatusCode, MessageBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_fields_is_a_client_error() {
        let (status, body) = body_of(AppError::MissingFields("email")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, MessageBody::new(MISSING_FIELDS_MESSAGE));
    }

    #[tokio::test]
    async fn store_failure_hides_internal_detail() {
        let redis_error = RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let (status, body) = body_of(PersistenceError::from(redis_error).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, SUBMISSION_FAILED_MESSAGE);
        assert!(!body.message.contains("refused"));
    }

    #[tokio::test]
    async fn delivery_failure_uses_the_same_generic_message() {
        let address_error = "nobody".parse::<lettre::Address>().unwrap_err();
        let (status, body) = body_of(DeliveryError::from(address_error).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, SUBMISSION_FAILED_MESSAGE);
    }
}
