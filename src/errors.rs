use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use std::convert::From;

use crate::storage::StorageError;

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),

    #[display(fmt = "Forbidden: {}", _0)]
    Forbidden(String),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Not Found")]
    NotFound,
}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().json("Internal Server Error, Please try later")
            }
            ServiceError::BadRequest(ref message) => HttpResponse::BadRequest().json(message),
            ServiceError::Conflict(ref message) => HttpResponse::Conflict().json(message),
            ServiceError::Forbidden(ref message) => HttpResponse::Forbidden().json(message),
            ServiceError::Unauthorized => HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound => HttpResponse::NotFound().json("Not Found"),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> ServiceError {
        match error {
            StorageError::Duplicate => ServiceError::Conflict("already exists".to_string()),
            StorageError::NotFound => ServiceError::NotFound,
            StorageError::Backend(message) => {
                error!("storage error: {}", message);
                ServiceError::InternalServerError
            }
        }
    }
}

impl From<actix_threadpool::BlockingError<ServiceError>> for ServiceError {
    fn from(error: actix_threadpool::BlockingError<ServiceError>) -> ServiceError {
        match error {
            actix_threadpool::BlockingError::Error(error) => error,
            actix_threadpool::BlockingError::Canceled => {
                error!("blocking operation was canceled, the thread pool is gone");
                ServiceError::InternalServerError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_keep_their_kind() {
        assert_eq!(
            ServiceError::from(StorageError::NotFound),
            ServiceError::NotFound
        );

        match ServiceError::from(StorageError::Duplicate) {
            ServiceError::Conflict(_) => {}
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn backend_errors_do_not_leak_details() {
        let error = StorageError::Backend("connection refused on 10.0.0.1:5432".to_string());

        assert_eq!(ServiceError::from(error), ServiceError::InternalServerError);
    }
}
