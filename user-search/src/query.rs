//! Query processing for record searches
//!
//! The pipeline is filter → sort → paginate. Raw wire parameters are parsed
//! into closed types ([`OrderDirection`], [`OrderField`], [`Window`]) before
//! any work is done, so the pipeline itself cannot fail.
//!
//! # Example
//!
//! ```rust
//! use user_search::query::{process, OrderDirection, OrderField, SearchQuery, Window};
//! use user_search::records::Record;
//!
//! let records = vec![
//!     Record {
//!         id: 1,
//!         guid: String::new(),
//!         age: 30,
//!         first_name: "Hilda".to_string(),
//!         last_name: "Mayer".to_string(),
//!         about: String::new(),
//!         gender: "female".to_string(),
//!     },
//! ];
//!
//! let query = SearchQuery::new("hilda")
//!     .with_order(OrderField::Id, OrderDirection::Descending)
//!     .with_window(Window::new(0, Some(10)));
//!
//! assert_eq!(process(records, &query).len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::records::Record;

/// Validation failure for search parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// `order_by` is not an integer or not one of -1, 0, 1
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// `order_field` is not one of Id, Age, Name
    #[error("unknown order field: {0}")]
    UnknownOrderField(String),

    /// `limit` is not a positive integer
    #[error("invalid limit value: {0}")]
    InvalidLimit(String),

    /// `offset` is not a non-negative integer
    #[error("invalid offset value: {0}")]
    InvalidOffset(String),
}

/// Sort direction, encoded on the wire as 1, 0 and -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Smallest first
    Ascending,
    /// Keep source order
    #[default]
    AsIs,
    /// Largest first
    Descending,
}

impl OrderDirection {
    /// Wire value of this direction
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::AsIs => 0,
            Self::Descending => -1,
        }
    }
}

impl TryFrom<i64> for OrderDirection {
    type Error = SearchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            0 => Ok(Self::AsIs),
            -1 => Ok(Self::Descending),
            other => Err(SearchError::InvalidOrder(other.to_string())),
        }
    }
}

impl FromStr for OrderDirection {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| SearchError::InvalidOrder(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Fields a search may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    Id,
    Age,
    /// Derived full name; the default when no field is given
    #[default]
    Name,
}

impl OrderField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Age => "Age",
            Self::Name => "Name",
        }
    }
}

impl FromStr for OrderField {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "Name" => Ok(Self::Name),
            "Id" => Ok(Self::Id),
            "Age" => Ok(Self::Age),
            other => Err(SearchError::UnknownOrderField(other.to_string())),
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open result window `[offset, offset + limit)`
///
/// A `limit` of `None` extends the window to the end of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Window {
    #[must_use]
    pub const fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// Parse raw `offset`/`limit` parameters
    ///
    /// Absent values mean "from the start" and "to the end". A present
    /// limit must be positive and a present offset non-negative.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Result<Self, SearchError> {
        let offset = match offset {
            None => 0,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 0)
                .and_then(|v| usize::try_from(v).ok())
                .ok_or_else(|| SearchError::InvalidOffset(raw.to_string()))?,
        };

        let limit = match limit {
            None => None,
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(|| SearchError::InvalidLimit(raw.to_string()))?,
            ),
        };

        Ok(Self { offset, limit })
    }
}

/// A fully validated search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub order_field: OrderField,
    pub direction: OrderDirection,
    pub window: Window,
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_order(mut self, field: OrderField, direction: OrderDirection) -> Self {
        self.order_field = field;
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Parse raw wire parameters
    ///
    /// Checks run in pipeline order: direction, then field, then window.
    /// The field is validated even for `AsIs`.
    pub fn parse(
        text: Option<&str>,
        order_field: Option<&str>,
        order_by: Option<&str>,
        offset: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, SearchError> {
        let direction: OrderDirection = order_by.unwrap_or_default().parse()?;
        let order_field: OrderField = order_field.unwrap_or_default().parse()?;
        let window = Window::parse(offset, limit)?;

        Ok(Self {
            text: text.unwrap_or_default().to_string(),
            order_field,
            direction,
            window,
        })
    }
}

/// Keep records whose full name or about text contains `text`, ignoring case
pub fn filter(records: Vec<Record>, text: &str) -> Vec<Record> {
    if text.is_empty() {
        return records;
    }

    let needle = text.to_lowercase();
    records
        .into_iter()
        .filter(|record| {
            record.full_name().to_lowercase().contains(&needle)
                || record.about.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort by `field` in `direction`; `AsIs` leaves the slice untouched
pub fn sort(records: &mut [Record], field: OrderField, direction: OrderDirection) {
    let descending = match direction {
        OrderDirection::AsIs => return,
        OrderDirection::Ascending => false,
        OrderDirection::Descending => true,
    };

    match field {
        OrderField::Id => sort_by_key(records, descending, |r| r.id),
        OrderField::Age => sort_by_key(records, descending, |r| r.age),
        OrderField::Name => sort_by_key(records, descending, Record::full_name),
    }
}

fn sort_by_key<K, F>(records: &mut [Record], descending: bool, key: F)
where
    K: Ord,
    F: Fn(&Record) -> K,
{
    if descending {
        records.sort_by(|a, b| key(b).cmp(&key(a)));
    } else {
        records.sort_by(|a, b| key(a).cmp(&key(b)));
    }
}

/// Cut `window` out of `records`
pub fn paginate(records: Vec<Record>, window: Window) -> Vec<Record> {
    if window.offset >= records.len() {
        return Vec::new();
    }

    let end = match window.limit {
        Some(limit) => window.offset.saturating_add(limit).min(records.len()),
        None => records.len(),
    };

    records
        .into_iter()
        .skip(window.offset)
        .take(end - window.offset)
        .collect()
}

/// Run the whole pipeline
pub fn process(records: Vec<Record>, query: &SearchQuery) -> Vec<Record> {
    let mut matched = filter(records, &query.text);
    sort(&mut matched, query.order_field, query.direction);
    paginate(matched, query.window)
}
