use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Route53 client operations.
///
/// Every failure surfaces to the caller of the client operation unchanged.
/// Nothing is retried or swallowed internally.
///
/// # Transient Errors
///
/// The following variants represent failures that may succeed on a later attempt:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`ServiceError`](Self::ServiceError) with a 5xx status or a throttling code
///
/// Use [`is_transient`](Self::is_transient) to decide whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Route53Error {
    /// A domain name was empty or has no IDNA encoding.
    #[error("Invalid name '{name}': {detail}")]
    InvalidName {
        /// The rejected text.
        name: String,
        /// Why it was rejected.
        detail: String,
    },

    /// A record's wire value does not match the shape of its type.
    #[error("Malformed {record_type} record '{value}': {detail}")]
    MalformedRecord {
        /// DNS type tag the value was decoded as.
        record_type: String,
        /// The offending wire value.
        value: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// An expected element or text node is missing from a successful response.
    #[error("Malformed response: {detail}")]
    MalformedResponse {
        /// Details about the missing or unreadable content.
        detail: String,
    },

    /// A `ResourceRecordSet` declared a type with no registered decoder.
    #[error("Unrecognized record type: {record_type}")]
    UnrecognizedRecordType {
        /// The unregistered type tag.
        record_type: String,
    },

    /// The response status was outside the operation's success set.
    #[error("HTTP {status}: {}", service_error_summary(.code.as_deref(), .message))]
    ServiceError {
        /// HTTP status code of the response.
        status: u16,
        /// `Sender` or `Receiver`, when the service reported it.
        error_type: Option<String>,
        /// Service error code, e.g. `NoSuchHostedZone`.
        code: Option<String>,
        /// Service message, or the raw body when it was not an error document.
        message: String,
        /// Request id assigned by the service, if any.
        request_id: Option<String>,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Serialization error: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The request could not be signed.
    #[error("Signing error: {detail}")]
    SigningError {
        /// Details about the signing failure.
        detail: String,
    },

    /// The operation exists in the API surface but is not implemented here.
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation {
        /// Name of the operation.
        operation: String,
    },
}

fn service_error_summary(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    }
}

/// Service error codes that indicate throttling rather than a bad request.
const THROTTLING_CODES: &[&str] = &["Throttling", "PriorRequestNotComplete"];

impl Route53Error {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidName { .. } | Self::UnsupportedOperation { .. } => true,
            Self::ServiceError { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Whether repeating the same request might succeed.
    ///
    /// The client never retries on its own; this is for callers that do.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } => true,
            Self::ServiceError { status, code, .. } => {
                *status >= 500
                    || *status == 429
                    || code
                        .as_deref()
                        .is_some_and(|c| THROTTLING_CODES.contains(&c))
            }
            _ => false,
        }
    }

    pub(crate) fn malformed_response(detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed_record(
        record_type: &str,
        value: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            record_type: record_type.to_string(),
            value: value.to_string(),
            detail: detail.into(),
        }
    }
}

/// Convenience type alias for `Result<T, Route53Error>`.
pub type Result<T> = std::result::Result<T, Route53Error>;
