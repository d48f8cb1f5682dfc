use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::quiz::DefinitionError;
use crate::registry::RegistryError;

const REGISTRY_FAILURE: &str = "Failed to update active quizzes";
const INVALID_REQUEST: &str = "Invalid request";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{error}")]
    Failed {
        status: StatusCode,
        error: String,
        message: Option<String>,
        details: Option<Value>,
    },
    #[error("{}", REGISTRY_FAILURE)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(error: S) -> Self {
        ApiError::BadRequest(error.into())
    }
}

impl From<DefinitionError> for ApiError {
    fn from(error: DefinitionError) -> Self {
        match error {
            DefinitionError::NoRows => ApiError::BadRequest(error.to_string()),
            DefinitionError::NoQuestions => ApiError::NotFound(error.to_string()),
        }
    }
}

// Extractor failures keep axum's status but get the JSON error body.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Failed {
            status: rejection.status(),
            error: INVALID_REQUEST.to_owned(),
            message: Some(rejection.body_text()),
            details: None,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Failed {
            status: rejection.status(),
            error: INVALID_REQUEST.to_owned(),
            message: Some(rejection.body_text()),
            details: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    message: None,
                    details: None,
                },
            ),
            ApiError::NotFound(error) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error,
                    message: None,
                    details: None,
                },
            ),
            ApiError::Failed {
                status,
                error,
                message,
                details,
            } => (
                status,
                ErrorBody {
                    error,
                    message,
                    details,
                },
            ),
            ApiError::Registry(source) => {
                tracing::error!(error = %source, "could not persist active quizzes");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: REGISTRY_FAILURE.to_owned(),
                        message: Some(source.to_string()),
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
