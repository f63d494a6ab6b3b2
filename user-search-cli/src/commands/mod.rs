pub mod find;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use user_search::config::Config;

/// Load configuration from `path` if given, otherwise from the usual locations
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::load_for_service("user-search").context("Failed to load configuration"),
    }
}
