//! Mapping of core errors onto HTTP responses.

use api_shared::{ErrorRes, FieldErrorRes};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use ehr_core::{PatientError, ValidationErrors};

/// Error returned by every handler. Always rendered as an [`ErrorRes`] JSON body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        fields: Vec<FieldErrorRes>,
    },
    NotFound(String),
    Conflict(String),
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            fields: vec![],
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest {
            message: errors.to_string(),
            fields: errors
                .errors()
                .iter()
                .map(|e| FieldErrorRes {
                    field: e.field.to_string(),
                    problem: e.problem.clone(),
                })
                .collect(),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::Validation(errors) => errors.into(),
            PatientError::InvalidInput(message) => ApiError::bad_request(message),
            PatientError::Conflict(_) => ApiError::Conflict(err.to_string()),
            PatientError::NotFound(_) => ApiError::NotFound(err.to_string()),
            storage => {
                tracing::error!("record store error: {:?}", storage);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest { message, fields } => ErrorRes { message, fields },
            ApiError::NotFound(message) | ApiError::Conflict(message) => ErrorRes {
                message,
                fields: vec![],
            },
            ApiError::Internal => ErrorRes {
                message: "Internal error".into(),
                fields: vec![],
            },
        };

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "rejected request: {}", body.message);
        }

        (status, Json(body)).into_response()
    }
}
