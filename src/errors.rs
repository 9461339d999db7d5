use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::envelope::Envelope;
use crate::forms::SchemaError;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Hash(String),
    Session(String),
    Schema(SchemaError),
    Validation(Vec<String>),
    BadRequest(String),
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    NotFound,
    RateLimited,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Schema(e) => write!(f, "{e}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::BadRequest(msg) => write!(f, "{msg}"),
            AppError::Unauthorized => write!(f, "Login required"),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::Forbidden => write!(f, "Access denied"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::RateLimited => {
                write!(f, "Too many failed login attempts. Please try again later.")
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Schema(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Db(_) | AppError::Hash(_) | AppError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.status_code().as_u16();
        let envelope = match self {
            AppError::Validation(errors) => {
                Envelope::new(code, "Validation failed", serde_json::json!(errors))
            }
            AppError::Schema(SchemaError::NotPublishable(errors)) => {
                Envelope::new(code, "Form cannot be published", serde_json::json!(errors))
            }
            AppError::Db(_) | AppError::Hash(_) | AppError::Session(_) => {
                log::error!("{self}");
                Envelope::new(code, "Internal Server Error", serde_json::Value::Null)
            }
            _ => Envelope::new(code, self.to_string(), serde_json::Value::Null),
        };
        envelope.into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<SchemaError> for AppError {
    fn from(e: SchemaError) -> Self {
        AppError::Schema(e)
    }
}

/// Turn a collected error list into `Err(AppError::Validation)` when non-empty.
pub fn ensure_valid(errors: Vec<String>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
