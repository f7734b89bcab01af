//! Blocking transport backed by `ureq`.
//!
//! Status codes are never turned into errors: a 404 or 500 comes back as an
//! `HttpResponse` like any other, leaving interpretation to the caller.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DEFAULT_BODY_LIMIT: u64 = 10 * 1024 * 1024;

/// Settings for [`UreqTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Value of the `user-agent` header sent with every request.
    pub user_agent: String,
    /// Global timeout for one request, from connect to end of body.
    pub timeout_secs: Option<u64>,
    /// Largest response body read into memory. Longer bodies fail with
    /// `TransportError::Http`.
    pub body_limit_bytes: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("social-http/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Executes canonical requests with a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    config: TransportConfig,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout_secs.map(Duration::from_secs))
            .build()
            .new_agent();
        Self { agent, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    type Response = HttpResponse;
    type Error = TransportError;

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.full_url()?;
        let body = request.encoded_body()?;
        let method = request.method;
        let ua = self.config.user_agent.as_str();

        if body.is_some() && !method.allows_body() {
            tracing::warn!(
                target: "social_http::transport",
                method = %method,
                url = %url,
                "dropping form body on a method without request body"
            );
        }

        let result = match (method, body) {
            (HttpMethod::Get, _) => self.agent.get(url.as_str()).header("user-agent", ua).call(),
            (HttpMethod::Delete, _) => self.agent.delete(url.as_str()).header("user-agent", ua).call(),
            (HttpMethod::Head, _) => self.agent.head(url.as_str()).header("user-agent", ua).call(),
            (HttpMethod::Options, _) => self.agent.options(url.as_str()).header("user-agent", ua).call(),
            (HttpMethod::Post, Some(form)) => self
                .agent
                .post(url.as_str())
                .header("user-agent", ua)
                .content_type(FORM_CONTENT_TYPE)
                .send(form.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(url.as_str()).header("user-agent", ua).send_empty(),
            (HttpMethod::Put, Some(form)) => self
                .agent
                .put(url.as_str())
                .header("user-agent", ua)
                .content_type(FORM_CONTENT_TYPE)
                .send(form.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(url.as_str()).header("user-agent", ua).send_empty(),
            (HttpMethod::Patch, Some(form)) => self
                .agent
                .patch(url.as_str())
                .header("user-agent", ua)
                .content_type(FORM_CONTENT_TYPE)
                .send(form.as_bytes()),
            (HttpMethod::Patch, None) => self.agent.patch(url.as_str()).header("user-agent", ua).send_empty(),
        };

        let mut response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(target: "social_http::transport", method = %method, url = %url, err = %err, "request error");
                return Err(err.into());
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.config.body_limit_bytes)
            .read_to_vec()?;

        tracing::debug!(target: "social_http::transport", method = %method, url = %url, status, "response received");

        Ok(HttpResponse {
            method,
            url,
            status,
            headers,
            body,
        })
    }
}
