//! Error types for the data provider.
//!
//! # Design
//! Transport failures and non-2xx responses are kept apart: `Transport`
//! means no response arrived at all, `Http` means the backend answered and
//! said no. `UnsupportedResponse` is the only error the provider raises on
//! its own initiative, when a list payload is neither a page envelope nor a
//! bare array.

use thiserror::Error;

/// Errors returned by `RestClient` and any `DataProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend returned a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 2xx response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A list payload was neither `{content, totalElements}` nor an array.
    #[error("unsupported list response shape (keys: {})", .keys.join(", "))]
    UnsupportedResponse { keys: Vec<String> },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("configuration error: {0}")]
    Config(String),
}
