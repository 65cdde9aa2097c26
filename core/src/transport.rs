//! Blocking `Transport` backed by `ureq`.
//!
//! # Design
//! Status-code-as-error is disabled on the agent so 4xx/5xx responses come
//! back as data and the core decides what they mean. Only failures where no
//! response exists at all (DNS, connect, TLS, timeout) become
//! `ApiError::Transport`.

use std::fmt;

use ureq::Agent;

use crate::client::DnsClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Sends requests to `config.base_url()` with a bearer token.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    config: ClientConfig,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").field("config", &self.config).finish()
    }
}

impl UreqTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Ok(Self { agent, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl DnsClient<UreqTransport> {
    /// Client talking to the provider described by `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(DnsClient::new(UreqTransport::new(config)?))
    }

    /// Client configured from `DNSHOST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.config.url_for(&request.path);
        let auth = format!("Bearer {}", self.config.api_token());
        let headers = request.headers;

        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &auth, &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &auth, &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &auth, &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &auth, &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&url), &auth, &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &auth, &headers).send_empty(),
        };

        let mut response = result.map_err(|e| {
            tracing::debug!(%url, error = %e, "transport failure");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::transport(format!("reading response body: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    auth: &str,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    builder = builder.header("authorization", auth);
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
