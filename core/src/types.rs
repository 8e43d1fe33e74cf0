//! Parameter and result types for the data provider operations.
//!
//! Records stay as `serde_json::Value`: the provider passes them through
//! untouched, so it has no business knowing their schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// Filter values merged verbatim into the query string.
pub type Filter = serde_json::Map<String, Value>;

/// A record identifier. Backends use both numeric and string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Str(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(n) => write!(f, "{n}"),
            Identifier::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Int(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Identifier::Int(n.into())
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Str(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::Str(s)
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    /// Integers become `Int`, anything else `Str`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(Identifier::Int)
            .unwrap_or_else(|_| Identifier::Str(s.to_string())))
    }
}

/// 1-based page selection as the UI expresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Reject the zero values the wire translation cannot represent.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.page == 0 {
            return Err(ProviderError::InvalidParams(
                "page must be at least 1".to_string(),
            ));
        }
        if self.per_page == 0 {
            return Err(ProviderError::InvalidParams(
                "perPage must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(ProviderError::InvalidParams(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Renders the wire form `field,ORDER`.
impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.order)
    }
}

impl FromStr for Sort {
    type Err = ProviderError;

    /// Parses `field,ORDER`; a bare `field` sorts ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = match s.rsplit_once(',') {
            Some((field, order)) => (field, order.parse()?),
            None => (s, SortOrder::Asc),
        };
        if field.is_empty() {
            return Err(ProviderError::InvalidParams(
                "sort field must not be empty".to_string(),
            ));
        }
        Ok(Sort::new(field, order))
    }
}

/// Parameters of `get_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub pagination: Pagination,
    pub sort: Sort,
    #[serde(default)]
    pub filter: Filter,
}

/// Parameters of `get_many_reference`: a list constrained to records whose
/// `target` field equals `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: Identifier,
    pub pagination: Pagination,
    pub sort: Sort,
    #[serde(default)]
    pub filter: Filter,
}

/// One page of records plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub data: Vec<Value>,
    pub total: u64,
}

/// Result of every non-list operation: whatever JSON the backend returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResult {
    pub data: Value,
}
