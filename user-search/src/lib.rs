//! # user-search
//!
//! Person-record search over HTTP, plus a typed client for it.
//!
//! ## Features
//!
//! - **Query pipeline**: case-insensitive filter, stable sort by `Id`, `Age` or `Name`, offset/limit window
//! - **HTTP endpoint**: `GET /` behind a static `AccessToken` header, JSON error envelope with stable codes
//! - **Record sources**: XML dataset file or in-memory list, re-read on every request
//! - **Client** (feature `client`): request validation, limit+1 over-fetch for `next_page`, typed errors
//! - **Ambient**: layered configuration, JSON tracing, health and readiness probes, graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone());
//!
//!     Server::new(config).serve(router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod query;
pub mod records;
pub mod server;
pub mod state;

#[cfg(feature = "client")]
pub mod client;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, OrderFieldMessage};
    pub use crate::error::{Error, ErrorCode, ErrorResponse, Result};
    pub use crate::handlers::router;
    pub use crate::health::{health, readiness};
    pub use crate::models::UserView;
    pub use crate::observability::init_tracing;
    pub use crate::query::{OrderDirection, OrderField, SearchQuery, Window};
    pub use crate::records::{Record, RecordSource, StaticSource, XmlFileSource};
    pub use crate::server::Server;
    pub use crate::state::AppState;

    #[cfg(feature = "client")]
    pub use crate::client::{ClientError, SearchClient, SearchRequest, SearchResponse};

    pub use axum::{
        extract::{Query, State},
        routing::get,
        Json, Router,
    };
}
