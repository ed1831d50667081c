use std::sync::Arc;

use axum::{
    Json,
    extract::{State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, warn};

use crate::{
    error::AppError,
    models::{ContactForm, MessageBody},
    state::State,
    utils::get_submission,
};

pub const HEALTH_MESSAGE: &str = "API is working. Use POST /api/contact to submit data.";
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_MESSAGE)
}

pub async fn contact_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let result = match payload {
        Ok(Json(form)) => submit(&state, form).await,
        // a body without a JSON content type is read as an empty form
        Err(JsonRejection::MissingJsonContentType(_)) => {
            submit(&state, ContactForm::default()).await
        }
        Err(rejection) => Err(AppError::MalformedPayload(rejection.body_text())),
    };

    result.inspect_err(|e| match e {
        AppError::MissingFields(_) | AppError::MalformedPayload(_) => {
            warn!("Rejected submission: {e}")
        }
        AppError::Persistence(_) | AppError::Delivery(_) => {
            error!("Error processing the request: {e}")
        }
    })
}

/// Validate, store, then notify.
///
/// The store write must succeed before any mail is attempted. A mail failure
/// after a successful write leaves the record in place.
pub async fn submit(state: &State, form: ContactForm) -> Result<Json<MessageBody>, AppError> {
    let submission = get_submission(form)?;

    let record = state.store.insert(submission).await?;
    info!("Contact {} saved", record.id);

    let receipt = state.notifier.send(&record.submission).await?;
    info!(
        "Email for contact {} sent: {} {}",
        record.id, receipt.code, receipt.response
    );

    Ok(Json(MessageBody::new(SUCCESS_MESSAGE)))
}
