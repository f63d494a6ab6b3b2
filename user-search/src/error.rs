//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::OrderFieldMessage;
use crate::query::SearchError;
use crate::records::LoadError;

/// Message sent with every 401
pub const BAD_ACCESS_TOKEN: &str = "Bad AccessToken";

/// Message sent with every 500
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Stable machine-readable error kinds shared by server and client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadAccessToken,
    InvalidOrder,
    UnknownOrderField,
    InvalidLimit,
    InvalidOffset,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadAccessToken => "BAD_ACCESS_TOKEN",
            Self::InvalidOrder => "INVALID_ORDER",
            Self::UnknownOrderField => "UNKNOWN_ORDER_FIELD",
            Self::InvalidLimit => "INVALID_LIMIT",
            Self::InvalidOffset => "INVALID_OFFSET",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "BAD_ACCESS_TOKEN" => Ok(Self::BadAccessToken),
            "INVALID_ORDER" => Ok(Self::InvalidOrder),
            "UNKNOWN_ORDER_FIELD" => Ok(Self::UnknownOrderField),
            "INVALID_LIMIT" => Ok(Self::InvalidLimit),
            "INVALID_OFFSET" => Ok(Self::InvalidOffset),
            "INTERNAL_ERROR" => Ok(Self::Internal),
            _ => Err(()),
        }
    }
}

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or mismatched access token
    #[error("Bad AccessToken")]
    Unauthorized,

    /// Rejected search parameters
    #[error("Bad request ({code}): {message}")]
    BadRequest { code: ErrorCode, message: String },

    /// Record source failed to produce a snapshot
    #[error("Record source error: {0}")]
    RecordSource(#[from] LoadError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Convert a search validation failure, rendering unknown order fields
    /// with the configured message format
    pub fn from_search(err: SearchError, format: OrderFieldMessage) -> Self {
        let (code, message) = match err {
            SearchError::UnknownOrderField(ref field) => {
                (ErrorCode::UnknownOrderField, format.render(field))
            }
            SearchError::InvalidOrder(_) => (ErrorCode::InvalidOrder, err.to_string()),
            SearchError::InvalidLimit(_) => (ErrorCode::InvalidLimit, err.to_string()),
            SearchError::InvalidOffset(_) => (ErrorCode::InvalidOffset, err.to_string()),
        };
        Error::BadRequest { code, message }
    }
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        Self::from_search(err, OrderFieldMessage::default())
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
///
/// Only `error` is guaranteed; `code` and `status` are absent in bodies
/// produced by older servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: Some(status.as_u16()),
        }
    }

    /// Create error response with a code
    pub fn with_code(status: StatusCode, code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.as_str().to_string()),
            status: Some(status.as_u16()),
        }
    }

    /// Parsed error code, if present and recognised
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.as_deref().and_then(|c| c.parse().ok())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_code(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::BadAccessToken,
                    BAD_ACCESS_TOKEN,
                ),
            ),

            Error::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, code, message),
            ),

            Error::RecordSource(e) => {
                tracing::error!("Record source error: {}", e);
                internal_error()
            }

            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                internal_error()
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                internal_error()
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal_error()
            }
        };

        (status, Json(error_response)).into_response()
    }
}

fn internal_error() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            INTERNAL_SERVER_ERROR,
        ),
    )
}
