//! Stateless HTTP request builder and response parser for the data provider.
//!
//! # Design
//! `RestClient` holds only a `ProviderConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller (usually `HttpDataProvider`) executes the
//! round trip in between, keeping this module deterministic and free of I/O.

use serde_json::Value;

use crate::config::ProviderConfig;
use crate::endpoint::{resolve, Verb};
use crate::error::ProviderError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ACCEPT, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE,
    TEXT_PLAIN,
};
use crate::normalize::normalize_list;
use crate::query::{ids_query, ListQuery};
use crate::types::{DataResult, Identifier, ListParams, ListResult, ReferenceParams};

/// Builds requests for, and parses responses from, a Spring-style backend.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: ProviderConfig,
}

impl RestClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn build_get_list(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<HttpRequest, ProviderError> {
        let query = ListQuery::new(&params.pagination, &params.sort)?.filters(&params.filter);
        let url = format!(
            "{}?{}",
            self.endpoint(resource, None, None),
            query.to_query_string()
        );
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_get_one(&self, resource: &str, id: &Identifier) -> HttpRequest {
        let url = self.endpoint(resource, Some(id), None);
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_get_many(&self, resource: &str, ids: &[Identifier]) -> HttpRequest {
        let url = format!("{}/by-ids?{}", self.endpoint(resource, None, None), ids_query(ids));
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_get_many_reference(
        &self,
        resource: &str,
        params: &ReferenceParams,
    ) -> Result<HttpRequest, ProviderError> {
        let query = ListQuery::new(&params.pagination, &params.sort)?
            .filters(&params.filter)
            .param(&params.target, params.id.to_string());
        let url = format!(
            "{}?{}",
            self.endpoint(resource, None, None),
            query.to_query_string()
        );
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_update(
        &self,
        resource: &str,
        id: &Identifier,
        data: &Value,
    ) -> Result<HttpRequest, ProviderError> {
        let url = self.endpoint(resource, Some(id), Some(Verb::Patch));
        Ok(self.request(HttpMethod::Patch, url, Some(json_body(data)?)))
    }

    pub fn build_update_many(
        &self,
        resource: &str,
        ids: &[Identifier],
        data: &Value,
    ) -> Result<HttpRequest, ProviderError> {
        let url = format!(
            "{}?{}",
            self.endpoint(resource, None, Some(Verb::Patch)),
            ids_query(ids)
        );
        Ok(self.request(HttpMethod::Patch, url, Some(json_body(data)?)))
    }

    pub fn build_create(&self, resource: &str, data: &Value) -> Result<HttpRequest, ProviderError> {
        let url = self.endpoint(resource, None, Some(Verb::Post));
        Ok(self.request(HttpMethod::Post, url, Some(json_body(data)?)))
    }

    /// The backend expects `text/plain` on single deletes even without a body.
    pub fn build_delete(&self, resource: &str, id: &Identifier) -> HttpRequest {
        let url = self.endpoint(resource, Some(id), Some(Verb::Delete));
        let mut req = self.request(HttpMethod::Delete, url, None);
        req.headers
            .push((CONTENT_TYPE.to_string(), TEXT_PLAIN.to_string()));
        req
    }

    pub fn build_delete_many(&self, resource: &str, ids: &[Identifier]) -> HttpRequest {
        let url = format!(
            "{}?{}",
            self.endpoint(resource, None, Some(Verb::Delete)),
            ids_query(ids)
        );
        self.request(HttpMethod::Delete, url, None)
    }

    /// Parse a `get_list` or `get_many_reference` response.
    pub fn parse_list(&self, response: HttpResponse) -> Result<ListResult, ProviderError> {
        normalize_list(parse_json(response)?)
    }

    /// Parse the response of any non-list operation.
    pub fn parse_data(&self, response: HttpResponse) -> Result<DataResult, ProviderError> {
        Ok(DataResult {
            data: parse_json(response)?,
        })
    }

    fn endpoint(&self, resource: &str, id: Option<&Identifier>, verb: Option<Verb>) -> String {
        resolve(self.config.mode, &self.config.base_url, resource, id, verb)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(ACCEPT.to_string(), APPLICATION_JSON.to_string())];
        if body.is_some() {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        if let Some(token) = &self.config.auth_token {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn json_body(data: &Value) -> Result<String, ProviderError> {
    serde_json::to_string(data).map_err(|e| ProviderError::Serialization(e.to_string()))
}

/// Check the status, then decode the body. An empty 2xx body is `null`.
fn parse_json(response: HttpResponse) -> Result<Value, ProviderError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ProviderError::Deserialization(e.to_string()))
}

/// Map non-2xx responses to `ProviderError::Http`.
///
/// The message prefers a JSON `message` field from the body and falls back
/// to the canonical reason phrase.
fn check_status(response: &HttpResponse) -> Result<(), ProviderError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            ureq::http::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("status {}", response.status));
    Err(ProviderError::Http {
        status: response.status,
        message,
        body: response.body.clone(),
    })
}
