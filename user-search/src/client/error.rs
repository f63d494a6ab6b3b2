//! Client-side error taxonomy

use thiserror::Error;

use crate::error::{ErrorCode, ErrorResponse};

/// Legacy symbolic message for an unknown order field
const LEGACY_ORDER_FIELD_TOKEN: &str = "ErrorBadOrderField";

/// Legacy sentence prefix for an unknown order field
const LEGACY_ORDER_FIELD_PREFIX: &str = "unknown order field";

/// Everything [`SearchClient::find_users`](super::SearchClient::find_users)
/// can fail with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("limit must be > 0")]
    InvalidLimit,

    #[error("offset must be >= 0")]
    InvalidOffset,

    #[error("Bad AccessToken")]
    BadAccessToken,

    /// Server rejected `order_by`; carries the server message verbatim
    #[error("{0}")]
    InvalidOrder(String),

    /// Server rejected the order field; carries the requested field
    #[error("OrderField {0} invalid")]
    UnknownOrderField(String),

    #[error("unknown bad request error: {0}")]
    UnknownBadRequest(String),

    /// 500 or any status the protocol does not define
    #[error("SearchServer fatal error")]
    ServerFatal { status: u16 },

    #[error("cant unpack error json: {0}")]
    UnpackError(String),

    #[error("cant unpack result json: {0}")]
    UnpackResult(String),

    /// Carries the full request URL
    #[error("timeout for {0}")]
    Timeout(String),

    #[error("invalid search url: {0}")]
    InvalidUrl(String),

    #[error("unknown error {0}")]
    Unknown(String),
}

impl ClientError {
    /// Classify a decoded `400` body
    ///
    /// The structured `code` wins; bodies without one fall back to the known
    /// order-field messages.
    pub fn from_bad_request(envelope: &ErrorResponse, order_field: &str) -> Self {
        match envelope.error_code() {
            Some(ErrorCode::InvalidOrder) => Self::InvalidOrder(envelope.error.clone()),
            Some(ErrorCode::UnknownOrderField) => Self::UnknownOrderField(order_field.to_string()),
            Some(ErrorCode::InvalidLimit) => Self::InvalidLimit,
            Some(ErrorCode::InvalidOffset) => Self::InvalidOffset,
            Some(_) => Self::UnknownBadRequest(envelope.error.clone()),
            None if is_legacy_order_field(&envelope.error) => {
                Self::UnknownOrderField(order_field.to_string())
            }
            None => Self::UnknownBadRequest(envelope.error.clone()),
        }
    }

    /// Whether the failure happened before any network call
    pub fn is_preflight(&self) -> bool {
        matches!(self, Self::InvalidLimit | Self::InvalidOffset | Self::InvalidUrl(_))
    }
}

fn is_legacy_order_field(message: &str) -> bool {
    message == LEGACY_ORDER_FIELD_TOKEN || message.starts_with(LEGACY_ORDER_FIELD_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn coded(code: ErrorCode, message: &str) -> ErrorResponse {
        ErrorResponse::with_code(StatusCode::BAD_REQUEST, code, message)
    }

    fn bare(message: &str) -> ErrorResponse {
        ErrorResponse {
            error: message.to_string(),
            code: None,
            status: None,
        }
    }

    #[test]
    fn test_classifies_by_code() {
        assert_eq!(
            ClientError::from_bad_request(&coded(ErrorCode::InvalidOrder, "invalid order: 7"), "Id"),
            ClientError::InvalidOrder("invalid order: 7".to_string())
        );
        assert_eq!(
            ClientError::from_bad_request(&coded(ErrorCode::InvalidLimit, "invalid limit value: 0"), "Id"),
            ClientError::InvalidLimit
        );
        assert_eq!(
            ClientError::from_bad_request(&coded(ErrorCode::InvalidOffset, "invalid offset value: x"), "Id"),
            ClientError::InvalidOffset
        );
    }

    #[test]
    fn test_order_field_code_ignores_message_format() {
        for message in ["unknown order field: About", "ErrorBadOrderField", "whatever"] {
            assert_eq!(
                ClientError::from_bad_request(&coded(ErrorCode::UnknownOrderField, message), "About"),
                ClientError::UnknownOrderField("About".to_string())
            );
        }
    }

    #[test]
    fn test_legacy_order_field_messages() {
        assert_eq!(
            ClientError::from_bad_request(&bare("ErrorBadOrderField"), "About"),
            ClientError::UnknownOrderField("About".to_string())
        );
        assert_eq!(
            ClientError::from_bad_request(&bare("unknown order field: About"), "About"),
            ClientError::UnknownOrderField("About".to_string())
        );
    }

    #[test]
    fn test_unrecognised_bad_request_is_wrapped() {
        let err = ClientError::from_bad_request(&bare("something odd"), "Id");
        assert_eq!(err, ClientError::UnknownBadRequest("something odd".to_string()));
        assert_eq!(err.to_string(), "unknown bad request error: something odd");

        let err = ClientError::from_bad_request(&coded(ErrorCode::Internal, "Internal Server Error"), "Id");
        assert!(matches!(err, ClientError::UnknownBadRequest(_)));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(ClientError::UnknownOrderField("About".to_string()).to_string(), "OrderField About invalid");
        assert_eq!(ClientError::ServerFatal { status: 500 }.to_string(), "SearchServer fatal error");
        assert_eq!(ClientError::Timeout("http://x/?limit=2".to_string()).to_string(), "timeout for http://x/?limit=2");
    }
}
