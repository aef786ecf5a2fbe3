//! Declarative descriptions of the API calls
//!
//! An [`Operation`] says everything about one call except where it goes and who
//! signs it: method, path, query, body, accepted statuses and the decoder for
//! the response body. It is built per call and consumed by
//! [`assemble`](crate::request::assemble).

use reqwest::Method;

use crate::decode::{
    decode_create_hosted_zone, decode_list_hosted_zones, decode_list_resource_record_sets,
    decode_no_content, decode_service_error,
};
use crate::error::Result;
use crate::name::Name;
use crate::types::{ChangeRequest, HostedZone, ListRecordSetsParams, RecordSets};
use crate::utils::log_sanitizer::body_for_log;
use crate::xml::XmlElement;

/// API version, first segment of every path.
pub const API_VERSION: &str = "2013-04-01";
/// Namespace of request root elements.
pub const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// Service name used in request signing.
pub const SERVICE: &str = "route53";

pub const HTTP_OK: u16 = 200;
pub const HTTP_CREATED: u16 = 201;

/// Turns a successful response body into the call's result.
pub type ResponseDecoder<T> = fn(&[u8]) -> Result<T>;

/// One API call, ready to be assembled into a request.
pub struct Operation<T> {
    pub service: &'static str,
    pub method: Method,
    /// Unencoded path segments, version first.
    pub path: Vec<String>,
    /// Query parameters; only present values are included.
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub ok_status: &'static [u16],
    pub decode: ResponseDecoder<T>,
}

impl<T> Operation<T> {
    fn new(method: Method, path: &[&str], decode: ResponseDecoder<T>) -> Self {
        Self {
            service: SERVICE,
            method,
            path: std::iter::once(API_VERSION)
                .chain(path.iter().copied())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: Vec::new(),
            ok_status: &[HTTP_OK],
            decode,
        }
    }

    #[must_use]
    fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    fn with_body(mut self, body: &XmlElement) -> Result<Self> {
        self.body = body.to_bytes()?;
        Ok(self)
    }

    #[must_use]
    fn with_ok_status(mut self, ok_status: &'static [u16]) -> Self {
        self.ok_status = ok_status;
        self
    }

    /// Splits off what is needed after the response arrives.
    pub(crate) fn into_parts(self) -> (RequestParts, ResponseHandler<T>) {
        (
            RequestParts {
                service: self.service,
                method: self.method,
                path: self.path,
                query: self.query,
                body: self.body,
            },
            ResponseHandler {
                ok_status: self.ok_status,
                decode: self.decode,
            },
        )
    }
}

/// The request half of an [`Operation`].
pub(crate) struct RequestParts {
    pub service: &'static str,
    pub method: Method,
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// The response half of an [`Operation`].
pub struct ResponseHandler<T> {
    ok_status: &'static [u16],
    decode: ResponseDecoder<T>,
}

impl<T> ResponseHandler<T> {
    /// Validates the status, then decodes; error bodies are never decoded as results.
    pub fn handle(self, status: u16, body: &[u8]) -> Result<T> {
        if !self.ok_status.contains(&status) {
            let err = decode_service_error(status, body);
            if err.is_expected() {
                log::warn!("[route53] {err}");
            } else {
                log::error!("[route53] {err}");
                log::error!("[route53] Raw response: {}", body_for_log(body));
            }
            return Err(err);
        }
        (self.decode)(body)
    }
}

// ============ Hosted zones ============

/// `POST /2013-04-01/hostedzone`
pub fn create_hosted_zone(caller_reference: &str, name: &Name) -> Result<Operation<HostedZone>> {
    let body = XmlElement::new("CreateHostedZoneRequest")
        .with_namespace(XMLNS)
        .with_child(XmlElement::leaf("CallerReference", caller_reference))
        .with_child(XmlElement::leaf("Name", name.to_ascii()));

    Ok(
        Operation::new(Method::POST, &["hostedzone"], decode_create_hosted_zone)
            .with_body(&body)?
            .with_ok_status(&[HTTP_CREATED]),
    )
}

/// `GET /2013-04-01/hostedzone`
pub fn list_hosted_zones() -> Operation<Vec<HostedZone>> {
    Operation::new(Method::GET, &["hostedzone"], decode_list_hosted_zones)
}

/// `DELETE /2013-04-01/hostedzone/{id}`
pub fn delete_hosted_zone(zone_id: &str) -> Operation<()> {
    Operation::new(Method::DELETE, &["hostedzone", zone_id], decode_no_content)
}

// ============ Record sets ============

/// `GET /2013-04-01/hostedzone/{id}/rrset`
pub fn list_resource_record_sets(
    zone_id: &str,
    params: &ListRecordSetsParams,
) -> Operation<RecordSets> {
    Operation::new(
        Method::GET,
        &["hostedzone", zone_id, "rrset"],
        decode_list_resource_record_sets,
    )
    .with_query(params.to_query())
}

/// `POST /2013-04-01/hostedzone/{id}/rrset`
pub fn change_resource_record_sets(
    zone_id: &str,
    changes: &[ChangeRequest],
) -> Result<Operation<()>> {
    let body = XmlElement::new("ChangeResourceRecordSetsRequest")
        .with_namespace(XMLNS)
        .with_child(
            XmlElement::new("ChangeBatch").with_child(
                XmlElement::new("Changes").with_children(changes.iter().map(ChangeRequest::to_element)),
            ),
        );

    Operation::new(
        Method::POST,
        &["hostedzone", zone_id, "rrset"],
        decode_no_content,
    )
    .with_body(&body)
}
