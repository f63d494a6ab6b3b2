//! Typed client for the search endpoint
//!
//! ```no_run
//! use user_search::client::{SearchClient, SearchRequest};
//! use user_search::query::OrderDirection;
//!
//! # async fn run() -> Result<(), user_search::client::ClientError> {
//! let client = SearchClient::new("http://127.0.0.1:8080/", Some("123".to_string()))?;
//! let page = client
//!     .find_users(&SearchRequest::new(10).with_order("Id", OrderDirection::Descending))
//!     .await?;
//! println!("{} users, more: {}", page.users.len(), page.next_page);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::{
    config::ClientConfig,
    error::ErrorResponse,
    middleware::ACCESS_TOKEN_HEADER,
    models::UserView,
    query::OrderDirection,
};

mod error;

pub use error::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_MAX_LIMIT: usize = 25;

/// One page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub limit: i64,
    pub offset: i64,
    pub query: String,
    pub order_field: String,
    pub order_by: OrderDirection,
}

impl SearchRequest {
    /// First page of `limit` records, source order, no filter
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            offset: 0,
            query: String::new(),
            order_field: String::new(),
            order_by: OrderDirection::AsIs,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_order(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_field = field.into();
        self.order_by = direction;
        self
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResponse {
    pub users: Vec<UserView>,
    /// More records exist past this page
    pub next_page: bool,
}

/// Client for a search server
///
/// Cheap to clone; configuration is fixed at construction.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    url: Url,
    access_token: Option<String>,
    max_limit: usize,
}

impl SearchClient {
    /// Client with the default timeout and page-size cap
    pub fn new(url: &str, access_token: Option<String>) -> Result<Self, ClientError> {
        Self::builder(url).access_token(access_token).build()
    }

    pub fn builder(url: impl Into<String>) -> SearchClientBuilder {
        SearchClientBuilder::new(url)
    }

    /// Client configured from the `client` config section
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::builder(config.base_url.clone())
            .access_token(config.access_token.clone())
            .timeout(config.timeout())
            .max_limit(config.max_limit)
            .build()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Fetch one page
    ///
    /// Asks the server for one record more than requested; receiving it
    /// means another page exists.
    pub async fn find_users(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        if request.limit <= 0 {
            return Err(ClientError::InvalidLimit);
        }
        if request.offset < 0 {
            return Err(ClientError::InvalidOffset);
        }

        let limit = self.page_limit(request.limit);
        let url = self.request_url(request, limit + 1);

        tracing::debug!(url = %url, "Searching users");

        let mut call = self.http.get(url.clone());
        if let Some(token) = &self.access_token {
            call = call.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = call.send().await.map_err(|e| transport_error(e, &url))?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::BadAccessToken),
            StatusCode::BAD_REQUEST => {
                let body = response.bytes().await.map_err(|e| transport_error(e, &url))?;
                let envelope: ErrorResponse = serde_json::from_slice(&body)
                    .map_err(|e| ClientError::UnpackError(e.to_string()))?;

                tracing::debug!(error = %envelope.error, code = ?envelope.code, "Search rejected");
                Err(ClientError::from_bad_request(&envelope, &request.order_field))
            }
            s if s.is_success() => {
                let body = response.bytes().await.map_err(|e| transport_error(e, &url))?;
                let mut users: Vec<UserView> = serde_json::from_slice(&body)
                    .map_err(|e| ClientError::UnpackResult(e.to_string()))?;

                let page = usize::try_from(limit).unwrap_or(usize::MAX);
                let next_page = users.len().checked_sub(page) == Some(1);
                if next_page {
                    users.truncate(page);
                }

                Ok(SearchResponse { users, next_page })
            }
            s => {
                tracing::warn!(status = s.as_u16(), url = %url, "Search server failed");
                Err(ClientError::ServerFatal { status: s.as_u16() })
            }
        }
    }

    /// Requested page size lowered to the cap
    ///
    /// Stays below `i64::MAX` so the over-fetch cannot overflow.
    fn page_limit(&self, requested: i64) -> i64 {
        let cap = i64::try_from(self.max_limit)
            .unwrap_or(i64::MAX)
            .clamp(1, i64::MAX - 1);
        requested.min(cap)
    }

    /// Request URL carrying the wire parameters
    fn request_url(&self, request: &SearchRequest, wire_limit: i64) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("limit", &wire_limit.to_string())
            .append_pair("offset", &request.offset.to_string())
            .append_pair("order_by", &request.order_by.to_string())
            .append_pair("order_field", &request.order_field)
            .append_pair("query", &request.query);
        url
    }
}

fn transport_error(err: reqwest::Error, url: &Url) -> ClientError {
    if err.is_timeout() {
        tracing::warn!(url = %url, "Search request timed out");
        ClientError::Timeout(url.to_string())
    } else {
        tracing::warn!(url = %url, error = %err, "Search request failed");
        ClientError::Unknown(err.to_string())
    }
}

/// Builder for [`SearchClient`]
#[derive(Debug, Clone)]
pub struct SearchClientBuilder {
    url: String,
    access_token: Option<String>,
    timeout: Duration,
    max_limit: usize,
}

impl SearchClientBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    pub fn access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Per-call budget covering connect, send and body read
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Largest page a single call may return
    pub fn max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub fn build(self) -> Result<SearchClient, ClientError> {
        let url = Url::parse(&self.url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Unknown(e.to_string()))?;

        Ok(SearchClient {
            http,
            url,
            access_token: self.access_token,
            max_limit: self.max_limit,
        })
    }
}
