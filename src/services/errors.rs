use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the service layer and rendered as JSON by actix.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Internal(_) => "internal",
        }
    }

    pub fn forbidden() -> Self {
        ServiceError::Forbidden("access denied".to_string())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    pub fn invalid(message: impl ToString) -> Self {
        ServiceError::InvalidInput(message.to_string())
    }

    pub fn internal(message: impl ToString) -> Self {
        ServiceError::Internal(message.to_string())
    }

    /// Like the `From` conversion, but names the missing record.
    pub fn missing(what: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| match err {
            RepositoryError::NotFound => ServiceError::not_found(what),
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound("record".to_string()),
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ServiceError::Internal(detail) = self {
            log::error!("Internal error: {detail}");
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn repository_errors_map_onto_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict("dup".into())),
            ServiceError::Conflict(message) if message == "dup"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::InvalidData("bad".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn error_response_carries_code_and_message() {
        let response = ServiceError::InvalidInput("stage is required".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().try_into_bytes().expect("body bytes");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["error"], "invalid_input");
        assert_eq!(body["message"], "stage is required");
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ServiceError::internal("disk I/O error");
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
