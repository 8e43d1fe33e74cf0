//! Provider configuration.
//!
//! # Design
//! The backend mode and base URL are a value handed to `RestClient::new`
//! rather than ambient process state, so two providers pointing at
//! different backends can coexist in one process. `from_env` is the only
//! place that reads the environment.

use crate::error::ProviderError;

pub const MOCK_DATA_VAR: &str = "MOCK_DATA";
pub const REST_URL_VAR: &str = "REST_URL";
pub const MOCK_URL_VAR: &str = "MOCK_URL";
pub const API_TOKEN_VAR: &str = "API_TOKEN";

/// Which URL layout the endpoint resolver produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Live REST paths: `{base}/{resource}/{id}`.
    #[default]
    Rest,
    /// Static fixture files: `{base}/{resource}[/id]/{verb}/index.json`.
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub mode: DataMode,
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ProviderConfig {
    pub fn rest(base_url: &str) -> Self {
        Self::new(DataMode::Rest, base_url)
    }

    pub fn mock(base_url: &str) -> Self {
        Self::new(DataMode::Mock, base_url)
    }

    pub fn new(mode: DataMode, base_url: &str) -> Self {
        Self {
            mode,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `MOCK_DATA=true` selects fixture mode and requires `MOCK_URL`;
    /// otherwise `REST_URL` is required. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match get(MOCK_DATA_VAR).as_deref() {
            Some("true") => DataMode::Mock,
            _ => DataMode::Rest,
        };
        let url_var = match mode {
            DataMode::Rest => REST_URL_VAR,
            DataMode::Mock => MOCK_URL_VAR,
        };
        let base_url = get(url_var)
            .ok_or_else(|| ProviderError::Config(format!("{url_var} is not set")))?;

        let mut config = Self::new(mode, &base_url);
        config.auth_token = get(API_TOKEN_VAR);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_rest_mode() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (REST_URL_VAR, "http://api.local/rest/"),
            (MOCK_URL_VAR, "http://fixtures.local"),
        ]))
        .unwrap();
        assert_eq!(config.mode, DataMode::Rest);
        assert_eq!(config.base_url, "http://api.local/rest");
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn mock_data_true_selects_fixture_url() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (MOCK_DATA_VAR, "true"),
            (REST_URL_VAR, "http://api.local/rest"),
            (MOCK_URL_VAR, "http://fixtures.local"),
        ]))
        .unwrap();
        assert_eq!(config.mode, DataMode::Mock);
        assert_eq!(config.base_url, "http://fixtures.local");
    }

    #[test]
    fn only_literal_true_enables_mock_mode() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (MOCK_DATA_VAR, "1"),
            (REST_URL_VAR, "http://api.local"),
        ]))
        .unwrap();
        assert_eq!(config.mode, DataMode::Rest);
    }

    #[test]
    fn missing_url_is_a_config_error() {
        let err = ProviderConfig::from_lookup(lookup(&[(MOCK_DATA_VAR, "true")])).unwrap_err();
        assert!(matches!(err, ProviderError::Config(ref msg) if msg.contains(MOCK_URL_VAR)));

        let err = ProviderConfig::from_lookup(lookup(&[(REST_URL_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }

    #[test]
    fn picks_up_api_token() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (REST_URL_VAR, "http://api.local"),
            (API_TOKEN_VAR, "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
    }
}
