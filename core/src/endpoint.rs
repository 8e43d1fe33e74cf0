//! Endpoint resolution for live REST paths and mock-fixture paths.

use std::fmt;

use crate::config::DataMode;
use crate::types::Identifier;

/// Verb hint selecting the fixture file in mock mode. Ignored in REST mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verb {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        })
    }
}

/// Produce the target URL for `resource`, without query string.
///
/// `base_url` is expected without a trailing slash.
pub fn resolve(
    mode: DataMode,
    base_url: &str,
    resource: &str,
    id: Option<&Identifier>,
    verb: Option<Verb>,
) -> String {
    match (mode, id) {
        (DataMode::Rest, Some(id)) => format!("{base_url}/{resource}/{id}"),
        (DataMode::Rest, None) => format!("{base_url}/{resource}"),
        // Fixture files are per-resource, not per-record: any id maps to `/id`.
        (DataMode::Mock, Some(_)) => {
            format!("{base_url}/{resource}/id/{}/index.json", verb.unwrap_or_default())
        }
        (DataMode::Mock, None) => {
            format!("{base_url}/{resource}/{}/index.json", verb.unwrap_or_default())
        }
    }
}
