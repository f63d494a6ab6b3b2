//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::records::{RecordSource, XmlFileSource};

/// Application state shared across handlers
///
/// Holds only immutable configuration and a handle to the record source;
/// records themselves are loaded per request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    records: Arc<dyn RecordSource>,
}

impl AppState {
    /// Create state reading records from the configured XML dataset
    pub fn new(config: Config) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the record source
    pub fn records(&self) -> &dyn RecordSource {
        self.records.as_ref()
    }
}

/// Builder for [`AppState`]
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    records: Option<Arc<dyn RecordSource>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the XML dataset with another record source
    pub fn record_source<S: RecordSource + 'static>(mut self, source: S) -> Self {
        self.records = Some(Arc::new(source));
        self
    }

    pub fn build(self) -> AppState {
        let config = self.config.unwrap_or_default();
        let records = self.records.unwrap_or_else(|| {
            tracing::debug!("Using XML dataset at {}", config.dataset.path.display());
            Arc::new(XmlFileSource::new(config.dataset.path.clone()))
        });

        AppState {
            config: Arc::new(config),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{tests::record, StaticSource};

    #[test]
    fn test_state_builder_defaults() {
        let state = AppState::builder().build();
        assert_eq!(state.config().service.name, "user-search");
    }

    #[tokio::test]
    async fn test_state_builder_custom_source() {
        let state = AppState::builder()
            .record_source(StaticSource::new(vec![record(7, "A", "B", 1, "")]))
            .build();
        let records = state.records().load().await.unwrap();
        assert_eq!(records[0].id, 7);
    }
}
