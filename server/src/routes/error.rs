//! Route-level error type.
//!
//! Every failing handler answers with a status code and a `{"detail": ...}`
//! body whose text is the error's `Display`. Request bodies go through
//! [`ApiJson`] so malformed JSON is answered the same way.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use records::ErrorBody;

use crate::services::challenge::ChallengeError;
use crate::services::ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    BadRequest(&'static str),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Invalid signature")]
    Signature(#[from] ChallengeError),
    /// Body missing, not JSON, or not the expected shape.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
}

pub(crate) fn api_error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Ledger(LedgerError::AlreadyRegistered(_)) => StatusCode::CONFLICT,
        ApiError::BadRequest(_) | ApiError::Ledger(_) | ApiError::Signature(_) => StatusCode::BAD_REQUEST,
        ApiError::Body(rejection) => rejection.status(),
    }
}

/// `Json` extractor whose rejection is an [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = api_error_to_status(&self);
        match &self {
            ApiError::Signature(source) => tracing::debug!(error = %source, "signature verification failed"),
            ApiError::Ledger(source) => tracing::debug!(error = %source, subject = %source.subject(), %status, "ledger rejected request"),
            _ => tracing::debug!(error = %self, %status, "request rejected"),
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

/// Reject blank values with `detail`.
pub(crate) fn require(value: &str, detail: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(detail));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_registered_is_conflict() {
        let err = ApiError::from(LedgerError::AlreadyRegistered("A".into()));
        assert_eq!(api_error_to_status(&err), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Account already registered");
    }

    #[test]
    fn other_ledger_errors_are_bad_request() {
        let err = ApiError::from(LedgerError::NotPatient("A".into()));
        assert_eq!(api_error_to_status(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn signature_errors_hide_cause() {
        let err = ApiError::from(ChallengeError::UnknownNonce);
        assert_eq!(api_error_to_status(&err), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid signature");
    }

    #[test]
    fn body_rejection_keeps_its_status() {
        let err = ApiError::from(JsonRejection::from(axum::extract::rejection::MissingJsonContentType::default()));
        assert_eq!(api_error_to_status(&err), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("x", "X is required").is_ok());
        let err = require("   ", "X is required").unwrap_err();
        assert_eq!(err.to_string(), "X is required");
    }
}
