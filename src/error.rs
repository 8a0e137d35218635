//!
//! # Error Handling
//!
//! Defines `AppError`, the single error type used by every handler and by
//! the authentication guard. It implements `actix_web::error::ResponseError`
//! so a handler returning `Result<_, AppError>` produces the right status
//! code and a JSON body, and it provides `From` conversions for the error
//! types of the underlying crates (`sqlx`, `validator`, `jsonwebtoken`,
//! `bcrypt`) so store and crypto calls propagate with `?`.
//!
//! The taxonomy is deliberately small:
//! - `Unauthorized`: missing, invalid or revoked token (401).
//! - `BadRequest`: malformed identifier, bad credentials, duplicate email (400).
//! - `NotFound`: no record matching both id and owner (404). Ownership
//!   mismatches are reported identically to absence so existence of another
//!   user's record is never disclosed.
//! - `Validation`: a request payload failed field validation (400).
//! - `Store`: any other persistence failure, surfaced with opaque detail (400).

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// Request is not authenticated (HTTP 401).
    Unauthorized(String),
    /// Malformed input that is not a payload-validation failure: bad id
    /// shape, bad credentials, duplicate unique key (HTTP 400).
    BadRequest(String),
    /// No record matched the id and the requesting owner (HTTP 404).
    NotFound(String),
    /// A request payload failed validation (HTTP 400).
    Validation(String),
    /// An unclassified failure from the persistence layer (HTTP 400).
    /// Store errors never crash the service.
    Store(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Store(msg) => write!(f, "Store Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            // Store failures carry opaque detail and map to 400, matching the
            // error contract of the wire API.
            AppError::Store(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
        }
    }
}

/// `RowNotFound` becomes `NotFound`; a unique-key violation is a client
/// error (duplicate email on registration); everything else is a store
/// failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::BadRequest("Duplicate record".into())
            }
            _ => AppError::Store(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// A token that fails signature or expiry checks is an authentication
/// failure, not a server error.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Store(format!("Password hashing failed: {}", error))
    }
}
