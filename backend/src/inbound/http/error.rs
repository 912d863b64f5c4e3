//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting handlers turn
//! failures into the uniform `{success: false, message}` envelope with
//! consistent status codes.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{DomainError, ErrorCode};

use super::schemas::ErrorResponse;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, DomainError>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        // Duplicate email answers 400, matching the original API contract.
        ErrorCode::Validation | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_message(error: &DomainError) -> &str {
    // Internal details stay in the logs.
    if matches!(error.code(), ErrorCode::Internal) {
        "Server error"
    } else {
        error.message()
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::Internal) {
            error!(message = %self.message(), "internal error surfaced to client");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(client_message(self)))
    }
}

/// Map body deserialization failures onto the uniform envelope.
///
/// Wire this through `web::JsonConfig::error_handler` so malformed JSON and
/// failed field validation answer 400 in the same shape as every other
/// failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(err.to_string()).into()
}
