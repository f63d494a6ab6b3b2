//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: USER_SEARCH_, nesting separator: `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/user-search/{service_name}/config.toml
//! 4. System directory: /etc/user-search/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const ENV_PREFIX: &str = "USER_SEARCH_";
const CONFIG_DIR_PREFIX: &str = "user-search";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Access token check
    #[serde(default)]
    pub auth: AuthConfig,

    /// Where records come from
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Settings used by the search client
    #[serde(default)]
    pub client: ClientConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Static access token configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token every search request must carry. When unset any non-empty
    /// token is accepted.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Record dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the XML dataset
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Human-readable form of the unknown-order-field error
///
/// Clients classify on the error code, so switching formats does not break
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderFieldMessage {
    /// `unknown order field: <field>`
    #[default]
    Sentence,
    /// The bare token `ErrorBadOrderField`
    Symbolic,
}

impl OrderFieldMessage {
    pub fn render(self, field: &str) -> String {
        match self {
            Self::Sentence => format!("unknown order field: {field}"),
            Self::Symbolic => "ErrorBadOrderField".to_string(),
        }
    }
}

/// Search behaviour configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub order_field_message: OrderFieldMessage,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS configuration
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Search client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the search service
    #[serde(default = "default_client_base_url")]
    pub base_url: String,

    /// Token sent in the `AccessToken` header
    #[serde(default)]
    pub access_token: Option<String>,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest page a single call may request
    #[serde(default = "default_client_max_limit")]
    pub max_limit: usize,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            access_token: None,
            timeout_ms: default_client_timeout_ms(),
            max_limit: default_client_max_limit(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset.xml")
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_client_base_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

fn default_client_timeout_ms() -> u64 {
    1000
}

fn default_client_max_limit() -> usize {
    25
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| CONFIG_DIR_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories; environment variables still
    /// take precedence.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Candidate config files, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: CONFIG_DIR_PREFIX.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            auth: AuthConfig::default(),
            dataset: DatasetConfig::default(),
            search: SearchConfig::default(),
            middleware: MiddlewareConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert!(config.auth.access_token.is_none());
        assert_eq!(config.client.max_limit, 25);
        assert_eq!(config.client.timeout(), Duration::from_secs(1));
        assert_eq!(config.search.order_field_message, OrderFieldMessage::Sentence);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "people"
port = 9000

[auth]
access_token = "123"

[dataset]
path = "/srv/people.xml"

[search]
order_field_message = "symbolic"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "people");
        assert_eq!(config.service.port, 9000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.auth.access_token.as_deref(), Some("123"));
        assert_eq!(config.dataset.path, PathBuf::from("/srv/people.xml"));
        assert_eq!(config.search.order_field_message, OrderFieldMessage::Symbolic);
        assert_eq!(config.client.max_limit, 25);
    }

    #[test]
    fn test_order_field_message_render() {
        assert_eq!(
            OrderFieldMessage::Sentence.render("About"),
            "unknown order field: About"
        );
        assert_eq!(OrderFieldMessage::Symbolic.render("About"), "ErrorBadOrderField");
    }
}
