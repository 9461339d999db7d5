//! The `{code, message, data}` wrapper every endpoint answers with.
//!
//! `code` mirrors the HTTP status the server sends, but consumers must not
//! rely on the transport: an operation succeeded only when `code` equals the
//! success code of that operation ([`Operation::success_code`]).

use std::fmt;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

/// Operations with a fixed success code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateForm,
    UpdateForm,
    FetchForm,
    ListForms,
    DeleteForm,
    PublishForm,
    FetchPublicForm,
    SubmitResponse,
    FetchStats,
    Register,
    Login,
}

impl Operation {
    pub fn success_code(self) -> u16 {
        match self {
            Operation::CreateForm | Operation::SubmitResponse | Operation::Register => CREATED,
            _ => OK,
        }
    }
}

/// An envelope whose code was not the expected success code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationError {
    pub code: u16,
    pub message: String,
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for ApplicationError {}

impl<T> Envelope<T> {
    pub fn new(code: u16, message: impl Into<String>, data: T) -> Self {
        Envelope { code, message: message.into(), data }
    }

    pub fn ok(data: T) -> Self {
        Envelope::new(OK, "OK", data)
    }

    pub fn created(data: T) -> Self {
        Envelope::new(CREATED, "Created", data)
    }

    /// Unwrap `data` if the envelope reports `operation`'s success code.
    /// The message is handed back verbatim otherwise.
    pub fn into_data(self, operation: Operation) -> Result<T, ApplicationError> {
        if self.code == operation.success_code() {
            Ok(self.data)
        } else {
            Err(ApplicationError { code: self.code, message: self.message })
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// JSON response whose HTTP status matches `code`.
    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}
