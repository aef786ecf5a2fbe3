//! Turns an [`Operation`] into a concrete HTTP request

use std::fmt;

use reqwest::{Method, Url};
use sha2::{Digest, Sha256};

use crate::operation::{Operation, ResponseHandler};

/// Default service host.
pub const DEFAULT_HOST: &str = "route53.amazonaws.com";
/// Default signing region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: None,
        }
    }
}

impl Endpoint {
    /// Parses `scheme://host[:port]`; a missing scheme means https.
    ///
    /// Anything beyond the authority (a path other than `/`, a query, a
    /// fragment or userinfo) is rejected.
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = if url.contains("://") {
            Url::parse(url)
        } else {
            Url::parse(&format!("https://{url}"))
        }
        .ok()?;

        if parsed.path() != "/"
            || parsed.query().is_some()
            || parsed.fragment().is_some()
            || !parsed.username().is_empty()
            || parsed.password().is_some()
        {
            return None;
        }

        Some(Self {
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str()?.to_string(),
            port: parsed.port(),
        })
    }

    /// `Host` header value; the port is omitted when it is the scheme default.
    pub fn authority(&self) -> String {
        match (self.scheme.as_str(), self.port) {
            (_, None) | ("https", Some(443)) | ("http", Some(80)) => self.host.clone(),
            (_, Some(port)) => format!("{}:{port}", self.host),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority())
    }
}

/// A fully assembled, not yet signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    /// Absolute path with each segment percent-encoded, e.g. `/2013-04-01/hostedzone`.
    pub path: String,
    /// Unencoded query parameters in operation order.
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Lowercase hex SHA-256 of `body`.
    pub content_sha256: String,
    pub region: String,
    pub service: String,
}

impl PreparedRequest {
    /// Query string with keys and values percent-encoded, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn url(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            format!("{}{}", self.endpoint, self.path)
        } else {
            format!("{}{}?{query}", self.endpoint, self.path)
        }
    }
}

/// Lowercase hex SHA-256 of a request body.
pub fn content_sha256(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Assembles the request for `op` and hands back the handler for its response.
pub fn assemble<T>(
    op: Operation<T>,
    endpoint: &Endpoint,
    region: &str,
) -> (PreparedRequest, ResponseHandler<T>) {
    let (parts, handler) = op.into_parts();

    let path = parts
        .path
        .iter()
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect::<String>();

    let request = PreparedRequest {
        method: parts.method,
        endpoint: endpoint.clone(),
        path,
        query: parts.query,
        content_sha256: content_sha256(&parts.body),
        body: parts.body,
        region: region.to_string(),
        service: parts.service.to_string(),
    };

    log::debug!(
        "[route53] Assembled {} {} ({} byte body)",
        request.method,
        request.url(),
        request.body.len()
    );

    (request, handler)
}
