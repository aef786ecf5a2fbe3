//! Response document decoding
//!
//! Every decoder takes the raw body of a successful response. Decoders build
//! their whole result locally and return it only when every element decoded,
//! so a failure never leaves a partially populated value behind.

use std::collections::HashSet;

use crate::error::{Result, Route53Error};
use crate::name::Name;
use crate::records::decoder_for;
use crate::types::{HostedZone, RecordSets};
use crate::utils::log_sanitizer::body_for_log;
use crate::xml::XmlElement;

/// Prefix the service puts in front of zone ids.
pub const HOSTED_ZONE_ID_PREFIX: &str = "/hostedzone/";

/// Maps a `<HostedZone>` element to a [`HostedZone`].
pub fn hosted_zone_from_element(zone: &XmlElement) -> Result<HostedZone> {
    let raw_id = zone.child_text("Id")?;
    let count = zone.child_text("ResourceRecordSetCount")?;

    Ok(HostedZone {
        name: zone.child_text("Name")?.to_string(),
        identifier: raw_id.replace(HOSTED_ZONE_ID_PREFIX, ""),
        rrset_count: count.trim().parse().map_err(|_| {
            Route53Error::malformed_response(format!(
                "ResourceRecordSetCount '{count}' is not a count"
            ))
        })?,
        reference: zone.child_text("CallerReference")?.to_string(),
    })
}

/// `CreateHostedZoneResponse` → the created zone.
pub fn decode_create_hosted_zone(body: &[u8]) -> Result<HostedZone> {
    let document = XmlElement::parse(body)?;
    let zone = document.find("HostedZone").ok_or_else(|| {
        Route53Error::malformed_response("creation response has no <HostedZone>")
    })?;
    hosted_zone_from_element(zone)
}

/// `ListHostedZonesResponse` → zones in document order.
pub fn decode_list_hosted_zones(body: &[u8]) -> Result<Vec<HostedZone>> {
    let document = XmlElement::parse(body)?;
    document
        .iterfind("HostedZones/HostedZone")
        .into_iter()
        .map(hosted_zone_from_element)
        .collect()
}

/// `ListResourceRecordSetsResponse` → records grouped by owner name.
///
/// Each set is decoded with the decoder registered for its `Type`; an
/// unregistered type fails the whole call.
pub fn decode_list_resource_record_sets(body: &[u8]) -> Result<RecordSets> {
    let document = XmlElement::parse(body)?;
    let mut result = RecordSets::new();

    for rrset in document.iterfind("ResourceRecordSets/ResourceRecordSet") {
        let name = Name::new(rrset.child_text("Name")?).map_err(|e| {
            Route53Error::malformed_response(format!("invalid record set name: {e}"))
        })?;
        let record_type = rrset.child_text("Type")?;
        let decode = decoder_for(record_type).ok_or_else(|| {
            Route53Error::UnrecognizedRecordType {
                record_type: record_type.to_string(),
            }
        })?;

        let records = rrset
            .iterfind("ResourceRecords/ResourceRecord")
            .into_iter()
            .map(decode)
            .collect::<Result<HashSet<_>>>()?;

        result.entry(name).or_default().extend(records);
    }

    Ok(result)
}

/// Responses whose body carries nothing the caller needs.
pub fn decode_no_content(_body: &[u8]) -> Result<()> {
    Ok(())
}

/// Interprets a non-success response as the service's error document.
///
/// Always returns [`Route53Error::ServiceError`]; when the body is not an
/// `ErrorResponse` document the raw text becomes the message.
pub fn decode_service_error(status: u16, body: &[u8]) -> Route53Error {
    let parsed = XmlElement::parse(body).ok().and_then(|document| {
        let error = document.expect_root("ErrorResponse").ok()?.find("Error")?;
        let text = |path: &str| error.find(path).and_then(XmlElement::text).map(str::to_string);
        Some((
            text("Type"),
            text("Code"),
            text("Message"),
            document
                .find("RequestId")
                .and_then(XmlElement::text)
                .map(str::to_string),
        ))
    });

    match parsed {
        Some((error_type, code, message, request_id)) => Route53Error::ServiceError {
            status,
            error_type,
            code,
            message: message.unwrap_or_default(),
            request_id,
        },
        None => Route53Error::ServiceError {
            status,
            error_type: None,
            code: None,
            message: body_for_log(body),
            request_id: None,
        },
    }
}
