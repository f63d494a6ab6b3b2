//! HTTP routes
//!
//! The search endpoint sits behind the access token middleware; the health
//! and readiness probes do not.

use axum::{middleware, routing::get, Router};

use crate::{
    health::{health, readiness},
    middleware::AccessTokenAuth,
    state::AppState,
};

pub mod search;

pub use search::{search_users, SearchParams};

/// Build the application router
pub fn router(state: AppState) -> Router {
    let auth = AccessTokenAuth::new(&state.config().auth);

    Router::new()
        .route("/", get(search_users))
        .route_layer(middleware::from_fn_with_state(
            auth,
            AccessTokenAuth::middleware,
        ))
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        config::{Config, OrderFieldMessage},
        error::{ErrorCode, ErrorResponse},
        models::UserView,
        records::{tests::record, LoadError, RecordSource, StaticSource},
    };

    struct BrokenSource;

    #[async_trait::async_trait]
    impl RecordSource for BrokenSource {
        async fn load(&self) -> Result<Vec<crate::records::Record>, LoadError> {
            Err(LoadError::Decode {
                path: "/secret/dataset.xml".to_string(),
                message: "unexpected end of file".to_string(),
            })
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.auth.access_token = Some("123".to_string());
        config
    }

    fn app() -> Router {
        let state = AppState::builder()
            .config(config())
            .record_source(StaticSource::new(vec![
                record(2, "Brooks", "Aguilar", 25, "Ipsum irure"),
                record(0, "Boyd", "Wolf", 22, "Nulla cillum enim"),
                record(1, "Hilda", "Mayer", 21, "Consequat anim"),
            ]))
            .build();
        router(state)
    }

    async fn get(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header("AccessToken", token);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_error(app: Router, uri: &str) -> (StatusCode, ErrorResponse) {
        let (status, body) = get(app, uri, Some("123")).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_search_sorted_and_windowed() {
        let (status, body) = get(app(), "/?order_field=Id&order_by=-1&limit=2&offset=0", Some("123")).await;
        assert_eq!(status, StatusCode::OK);

        let users: Vec<UserView> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_search_defaults_to_name_and_whole_collection() {
        let (status, body) = get(app(), "/?order_by=1", Some("123")).await;
        assert_eq!(status, StatusCode::OK);

        let users: Vec<UserView> = serde_json::from_slice(&body).unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Boyd Wolf", "Brooks Aguilar", "Hilda Mayer"]);
    }

    #[tokio::test]
    async fn test_search_empty_result_is_empty_array() {
        let (status, body) = get(app(), "/?query=nobody&order_by=0", Some("123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let (status, body) = get(app(), "/?order_by=0&offset=3&limit=5", Some("123")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = get(app(), "/?order_by=0", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "Bad AccessToken");
        assert_eq!(err.error_code(), Some(ErrorCode::BadAccessToken));
    }

    #[tokio::test]
    async fn test_wrong_token_is_unauthorized() {
        let (status, _) = get(app(), "/?order_by=0", Some("456")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_order() {
        let (status, err) = get_error(app(), "/?order_by=-2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "invalid order: -2");
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidOrder));

        let (status, err) = get_error(app(), "/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidOrder));
    }

    #[tokio::test]
    async fn test_unknown_order_field() {
        let (status, err) = get_error(app(), "/?order_field=About&order_by=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "unknown order field: About");
        assert_eq!(err.error_code(), Some(ErrorCode::UnknownOrderField));
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_unknown_order_field_symbolic_message() {
        let mut config = config();
        config.search.order_field_message = OrderFieldMessage::Symbolic;
        let state = AppState::builder()
            .config(config)
            .record_source(StaticSource::default())
            .build();

        let (_, err) = get_error(router(state), "/?order_field=About&order_by=1").await;
        assert_eq!(err.error, "ErrorBadOrderField");
        assert_eq!(err.error_code(), Some(ErrorCode::UnknownOrderField));
    }

    #[tokio::test]
    async fn test_invalid_window() {
        let (status, err) = get_error(app(), "/?order_by=0&limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidLimit));

        let (_, err) = get_error(app(), "/?order_by=0&limit=0").await;
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidLimit));

        let (_, err) = get_error(app(), "/?order_by=0&offset=-3").await;
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidOffset));
    }

    #[tokio::test]
    async fn test_record_source_failure_is_not_leaked() {
        let state = AppState::builder()
            .config(config())
            .record_source(BrokenSource)
            .build();

        let (status, body) = get(router(state), "/?order_by=0", Some("123")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let text = String::from_utf8(body).unwrap();
        assert!(!text.contains("secret"));
        let err: ErrorResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(err.error, "Internal Server Error");
        assert_eq!(err.error_code(), Some(ErrorCode::Internal));
    }

    #[tokio::test]
    async fn test_record_source_failure_wins_over_bad_params() {
        let state = AppState::builder()
            .config(config())
            .record_source(BrokenSource)
            .build();

        let (status, _) = get(router(state), "/?order_by=9", Some("123")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_probes_skip_authentication() {
        let (status, _) = get(app(), "/health", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get(app(), "/ready", None).await;
        assert_eq!(status, StatusCode::OK);

        let state = AppState::builder()
            .config(config())
            .record_source(BrokenSource)
            .build();
        let (status, _) = get(router(state), "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
