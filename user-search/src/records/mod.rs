//! Person records and the sources they are loaded from
//!
//! A [`RecordSource`] hands out an ordered snapshot of the whole collection.
//! Sources are read on every request; nothing here caches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod xml;

pub use xml::XmlFileSource;

/// A single person record as stored by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub guid: String,
    pub age: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub gender: String,
}

impl Record {
    /// `first_name + " " + last_name`, computed on every call
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Failure to produce a record snapshot
#[derive(Debug, Error)]
pub enum LoadError {
    /// The backing file could not be read
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not in the expected shape
    #[error("failed to decode dataset {path}: {message}")]
    Decode { path: String, message: String },
}

/// Supplier of an ordered sequence of records
///
/// Implementations must return the records in a deterministic order; the
/// query pipeline relies on it for `AsIs` ordering and stable sorts.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load the full collection
    async fn load(&self) -> Result<Vec<Record>, LoadError>;
}

/// Record source backed by an in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<Record>,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn load(&self) -> Result<Vec<Record>, LoadError> {
        Ok(self.records.clone())
    }
}
