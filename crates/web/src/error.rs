use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use importer::ImporterError;
use std::fmt;
use storage::{dto::common::FailResponse, error::StorageError};
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Import(ImporterError),
    Validation(ValidationErrors),
    BadRequest(String),
    PayloadTooLarge,
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Import(e) => write!(f, "Import error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::PayloadTooLarge => write!(f, "Payload too large"),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

fn storage_failure(error: &StorageError) -> (StatusCode, FailResponse) {
    match error {
        StorageError::NotFound => (StatusCode::NOT_FOUND, FailResponse::new("Contact not found")),
        StorageError::ConstraintViolation(msg) => {
            (StatusCode::CONFLICT, FailResponse::new(msg.as_str()))
        }
        e => {
            tracing::error!("Storage error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                FailResponse::new("An internal error occurred"),
            )
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            Self::Storage(e) => storage_failure(e),
            Self::Import(ImporterError::StorageError(e)) => storage_failure(e),
            Self::Import(e) if e.is_invalid_upload() => {
                (StatusCode::BAD_REQUEST, FailResponse::new(e.to_string()))
            }
            Self::Import(e) => {
                tracing::error!("Import error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FailResponse::new("An internal error occurred"),
                )
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    FailResponse::new("Validation failed").with_details(field_errors),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, FailResponse::new(msg.as_str())),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                FailResponse::new("Uploaded file exceeds the size limit"),
            ),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, FailResponse::new("Unauthorized")),
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ImporterError> for WebError {
    fn from(error: ImporterError) -> Self {
        Self::Import(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}
