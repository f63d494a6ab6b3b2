//! Record search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    models::UserView,
    query::{self, SearchQuery},
    state::AppState,
};

/// Raw query parameters, validated by [`SearchQuery::parse`]
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub order_field: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchParams {
    fn parse(&self) -> std::result::Result<SearchQuery, query::SearchError> {
        SearchQuery::parse(
            self.query.as_deref(),
            self.order_field.as_deref(),
            self.order_by.as_deref(),
            self.offset.as_deref(),
            self.limit.as_deref(),
        )
    }
}

/// Filter, sort and paginate the record collection
///
/// Records are loaded before parameters are validated, so a broken source
/// yields 500 even for a malformed request.
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserView>>> {
    let records = state.records().load().await?;

    let search = params.parse().map_err(|e| {
        tracing::debug!(error = %e, "Rejected search parameters");
        Error::from_search(e, state.config().search.order_field_message)
    })?;

    let total = records.len();
    let users: Vec<UserView> = query::process(records, &search)
        .into_iter()
        .map(UserView::from)
        .collect();

    tracing::debug!(
        query = %search.text,
        order_field = %search.order_field,
        order_by = %search.direction,
        offset = search.window.offset,
        limit = ?search.window.limit,
        total,
        returned = users.len(),
        "Search completed"
    );

    Ok(Json(users))
}
