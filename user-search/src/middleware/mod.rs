//! Middleware for authentication and request tracking

pub mod request_tracking;
pub mod token;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, SENSITIVE_HEADERS,
};
pub use token::{AccessTokenAuth, ACCESS_TOKEN_HEADER};
