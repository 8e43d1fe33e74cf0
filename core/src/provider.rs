//! The CRUD capability interface and its HTTP implementation.
//!
//! # Design
//! `DataProvider` is the fixed surface a presentation layer consumes.
//! `HttpDataProvider` satisfies it by pairing the I/O-free `RestClient` with
//! a `Transport`: build, execute, parse, one round trip per call. Swapping
//! the transport (e.g. for a canned one in tests) leaves request building
//! and response parsing untouched.

use serde_json::Value;

use crate::client::RestClient;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DataResult, Identifier, ListParams, ListResult, ReferenceParams};

/// Executes a single HTTP request.
///
/// Implementations must return non-2xx responses as data, not as errors;
/// `Err` is reserved for failures where no response arrived.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError>;
}

/// Largest response body `UreqTransport` reads; ureq alone stops at 10 MiB.
pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ProviderError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = req;

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(&url), &headers), body),
        };
        let mut response = result.map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// The CRUD operations an admin UI asks of its backend.
pub trait DataProvider {
    fn get_list(&self, resource: &str, params: &ListParams) -> Result<ListResult, ProviderError>;

    fn get_one(&self, resource: &str, id: &Identifier) -> Result<DataResult, ProviderError>;

    fn get_many(&self, resource: &str, ids: &[Identifier]) -> Result<DataResult, ProviderError>;

    fn get_many_reference(
        &self,
        resource: &str,
        params: &ReferenceParams,
    ) -> Result<ListResult, ProviderError>;

    fn update(
        &self,
        resource: &str,
        id: &Identifier,
        data: &Value,
    ) -> Result<DataResult, ProviderError>;

    fn update_many(
        &self,
        resource: &str,
        ids: &[Identifier],
        data: &Value,
    ) -> Result<DataResult, ProviderError>;

    fn create(&self, resource: &str, data: &Value) -> Result<DataResult, ProviderError>;

    fn delete(&self, resource: &str, id: &Identifier) -> Result<DataResult, ProviderError>;

    fn delete_many(&self, resource: &str, ids: &[Identifier])
        -> Result<DataResult, ProviderError>;
}

/// `DataProvider` over a Spring-style REST backend.
#[derive(Debug, Clone)]
pub struct HttpDataProvider<T = UreqTransport> {
    client: RestClient,
    transport: T,
}

impl HttpDataProvider<UreqTransport> {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> HttpDataProvider<T> {
    pub fn with_transport(config: ProviderConfig, transport: T) -> Self {
        Self {
            client: RestClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    fn round_trip<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&RestClient, HttpResponse) -> Result<R, ProviderError>,
    ) -> Result<R, ProviderError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");

        let result = self
            .transport
            .execute(request)
            .and_then(|response| {
                tracing::debug!(%method, %url, status = response.status, "received response");
                parse(&self.client, response)
            });
        if let Err(err) = &result {
            tracing::warn!(%method, %url, error = %err, "request failed");
        }
        result
    }
}

impl<T: Transport> DataProvider for HttpDataProvider<T> {
    fn get_list(&self, resource: &str, params: &ListParams) -> Result<ListResult, ProviderError> {
        let request = self.client.build_get_list(resource, params)?;
        self.round_trip(request, RestClient::parse_list)
    }

    fn get_one(&self, resource: &str, id: &Identifier) -> Result<DataResult, ProviderError> {
        let request = self.client.build_get_one(resource, id);
        self.round_trip(request, RestClient::parse_data)
    }

    fn get_many(&self, resource: &str, ids: &[Identifier]) -> Result<DataResult, ProviderError> {
        let request = self.client.build_get_many(resource, ids);
        self.round_trip(request, RestClient::parse_data)
    }

    fn get_many_reference(
        &self,
        resource: &str,
        params: &ReferenceParams,
    ) -> Result<ListResult, ProviderError> {
        let request = self.client.build_get_many_reference(resource, params)?;
        self.round_trip(request, RestClient::parse_list)
    }

    fn update(
        &self,
        resource: &str,
        id: &Identifier,
        data: &Value,
    ) -> Result<DataResult, ProviderError> {
        let request = self.client.build_update(resource, id, data)?;
        self.round_trip(request, RestClient::parse_data)
    }

    fn update_many(
        &self,
        resource: &str,
        ids: &[Identifier],
        data: &Value,
    ) -> Result<DataResult, ProviderError> {
        let request = self.client.build_update_many(resource, ids, data)?;
        self.round_trip(request, RestClient::parse_data)
    }

    fn create(&self, resource: &str, data: &Value) -> Result<DataResult, ProviderError> {
        let request = self.client.build_create(resource, data)?;
        self.round_trip(request, RestClient::parse_data)
    }

    fn delete(&self, resource: &str, id: &Identifier) -> Result<DataResult, ProviderError> {
        let request = self.client.build_delete(resource, id);
        self.round_trip(request, RestClient::parse_data)
    }

    fn delete_many(
        &self,
        resource: &str,
        ids: &[Identifier],
    ) -> Result<DataResult, ProviderError> {
        let request = self.client.build_delete_many(resource, ids);
        self.round_trip(request, RestClient::parse_data)
    }
}
