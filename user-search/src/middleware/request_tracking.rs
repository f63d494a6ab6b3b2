//! Request tracking middleware
//!
//! Request ID generation and propagation, and masking of credential
//! headers in trace output.

use http::HeaderName;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &["accesstoken", "authorization", "cookie", "x-api-key"];

/// Create a request ID layer generating UUID request IDs in `x-request-id`
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
