//! Classification of list payloads into `ListResult`.
//!
//! Both list-style operations go through `normalize_list`; there is no
//! second copy of the shape rules.

use serde_json::Value;

use crate::error::ProviderError;
use crate::types::ListResult;

pub const CONTENT: &str = "content";
pub const TOTAL_ELEMENTS: &str = "totalElements";

/// Accepts a page envelope `{content, totalElements}` or a bare array.
pub fn normalize_list(payload: Value) -> Result<ListResult, ProviderError> {
    match payload {
        Value::Object(mut map) if map.contains_key(CONTENT) && map.contains_key(TOTAL_ELEMENTS) => {
            let keys = map.keys().cloned().collect();
            let total = map.get(TOTAL_ELEMENTS).and_then(Value::as_u64);
            match (map.remove(CONTENT), total) {
                (Some(Value::Array(data)), Some(total)) => Ok(ListResult { data, total }),
                _ => Err(ProviderError::UnsupportedResponse { keys }),
            }
        }
        Value::Array(data) => {
            let total = data.len() as u64;
            Ok(ListResult { data, total })
        }
        other => Err(unsupported(&other)),
    }
}

fn unsupported(payload: &Value) -> ProviderError {
    let keys = payload
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    ProviderError::UnsupportedResponse { keys }
}
