//! HTTP transport
//!
//! The client hands a signed request to a [`Transport`] and gets back the raw
//! status and body. Everything protocol-specific (status checks, XML) happens
//! after this point, so a transport only moves bytes.
//!
//! Requests are sent exactly once: there is no retry here or anywhere above.
//! Callers that want retries can check [`Route53Error::is_transient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, Route53Error};
use crate::request::PreparedRequest;
use crate::utils::log_sanitizer::{body_for_log, header_for_log};

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default timeout for the whole request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A request plus the headers produced by signing it.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub request: PreparedRequest,
    pub headers: Vec<(String, String)>,
}

impl SignedRequest {
    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends one request and returns the raw response.
///
/// Non-2xx statuses are not errors at this layer; only failing to get a
/// response at all is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &SignedRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| Route53Error::NetworkError {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Uses an existing client, keeping its timeouts and TLS settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, signed: &SignedRequest) -> Result<RawResponse> {
        let request = &signed.request;
        let url = request.url();
        log::debug!("[route53] {} {url}", request.method);

        let mut builder = self.client.request(request.method.clone(), &url);
        for (name, value) in &signed.headers {
            // reqwest derives Host from the URL
            if name.eq_ignore_ascii_case("host") {
                continue;
            }
            log::trace!("[route53] {name}: {}", header_for_log(name, value));
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder
                .header("content-type", "application/xml")
                .body(request.body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Route53Error::Timeout {
                    detail: e.to_string(),
                }
            } else {
                Route53Error::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[route53] Response Status: {status}");

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Route53Error::Timeout {
                        detail: e.to_string(),
                    }
                } else {
                    Route53Error::NetworkError {
                        detail: format!("Failed to read response body: {e}"),
                    }
                }
            })?
            .to_vec();

        log::debug!("[route53] Response Body: {}", body_for_log(&body));

        Ok(RawResponse { status, body })
    }
}
