//! Query-string construction for list-style requests.
//!
//! # Design
//! Parameters live in a `BTreeMap`, so keys come out sorted and a later
//! insert replaces an earlier one. Reserved keys go in first, then filters,
//! then any explicit `param` such as the reference target, so a filter named
//! `page` wins over the pagination. Overwrites are logged, not rejected.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::error::ProviderError;
use crate::types::{Filter, Identifier, Pagination, Sort};

pub const PAGE: &str = "page";
pub const SIZE: &str = "size";
pub const SORT: &str = "sort";
pub const IDS: &str = "ids";

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryValue {
    /// Key without `=value`, produced by a JSON `null`.
    Flag,
    /// One pair per entry; `None` entries (array nulls) render as a bare key.
    Values(Vec<Option<String>>),
}

/// Pagination, sort, and filter parameters of a list request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    params: BTreeMap<String, QueryValue>,
}

impl ListQuery {
    /// Start a query with the reserved `page`, `size`, and `sort` keys.
    ///
    /// `page` is translated from the 1-based UI page to the 0-based wire page.
    pub fn new(pagination: &Pagination, sort: &Sort) -> Result<Self, ProviderError> {
        pagination.validate()?;
        let mut query = Self::default();
        query.insert(SORT, QueryValue::Values(vec![Some(sort.to_string())]));
        query.insert(PAGE, QueryValue::Values(vec![Some((pagination.page - 1).to_string())]));
        query.insert(SIZE, QueryValue::Values(vec![Some(pagination.per_page.to_string())]));
        Ok(query)
    }

    /// Merge filter entries as top-level keys. Empty arrays are skipped.
    pub fn filters(mut self, filter: &Filter) -> Self {
        for (key, value) in filter {
            if let Some(value) = filter_value(value) {
                self.insert(key, value);
            }
        }
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, QueryValue::Values(vec![Some(value.into())]));
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            let key = encode(key);
            match value {
                QueryValue::Flag => pairs.push(key),
                QueryValue::Values(values) => {
                    pairs.extend(values.iter().map(|v| match v {
                        Some(v) => format!("{key}={}", encode(v)),
                        None => key.clone(),
                    }));
                }
            }
        }
        pairs.join("&")
    }

    fn insert(&mut self, key: &str, value: QueryValue) {
        if self.params.insert(key.to_string(), value).is_some() {
            tracing::warn!(key, "query parameter overwritten by a later value");
        }
    }
}

/// `ids=a,b,c` with each id encoded on its own so the separators stay literal.
pub fn ids_query(ids: &[Identifier]) -> String {
    let joined = ids
        .iter()
        .map(|id| encode(&id.to_string()))
        .collect::<Vec<_>>()
        .join(",");
    format!("{IDS}={joined}")
}

fn filter_value(value: &Value) -> Option<QueryValue> {
    match value {
        Value::Null => Some(QueryValue::Flag),
        Value::Array(items) => {
            let values: Vec<Option<String>> = items
                .iter()
                .map(|item| (!item.is_null()).then(|| scalar_text(item)))
                .collect();
            (!values.is_empty()).then_some(QueryValue::Values(values))
        }
        other => Some(QueryValue::Values(vec![Some(scalar_text(other))])),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
