//! Data provider for admin dashboards backed by a Spring-style REST API.
//!
//! # Overview
//! Maps a fixed CRUD capability interface (`DataProvider`) onto HTTP calls:
//! endpoint resolution, pagination/sort/filter query strings, and
//! normalization of list payloads that arrive either as a page envelope
//! `{content, totalElements}` or as a bare JSON array.
//!
//! # Design
//! - `RestClient` is stateless and I/O-free: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `HttpDataProvider` pairs it with a `Transport` (default: `ureq`) and
//!   implements `DataProvider`, one round trip per operation.
//! - Backend mode and base URL are an explicit `ProviderConfig`;
//!   `ProviderConfig::from_env` is the only code reading the environment.
//! - Records stay `serde_json::Value`; the provider never reshapes them.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod types;

pub use client::RestClient;
pub use config::{DataMode, ProviderConfig};
pub use endpoint::Verb;
pub use error::ProviderError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::normalize_list;
pub use provider::{DataProvider, HttpDataProvider, Transport, UreqTransport};
pub use query::ListQuery;
pub use types::{
    DataResult, Filter, Identifier, ListParams, ListResult, Pagination, ReferenceParams, Sort,
    SortOrder,
};
