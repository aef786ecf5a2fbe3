//! Change batch construction
//!
//! CREATE, DELETE and UPSERT follow the `ChangeResourceRecordSets` contract.
//! Alias, failover, geolocation and latency-based record sets need routing
//! policy elements this crate does not model; their factories fail with
//! [`Route53Error::UnsupportedOperation`] instead of building a partial change.

use crate::error::{Result, Route53Error};
use crate::name::Name;
use crate::records::Record;
use crate::types::{ChangeAction, ChangeRequest};
use crate::xml::XmlElement;

/// TTL, in seconds, attached to every submitted record set.
pub const CHANGE_TTL: u32 = 60 * 60 * 24;

fn change<R>(
    action: ChangeAction,
    name: Name,
    record_type: &str,
    records: impl IntoIterator<Item = R>,
) -> ChangeRequest
where
    R: Into<Record>,
{
    ChangeRequest {
        action,
        name,
        record_type: record_type.to_string(),
        records: records.into_iter().map(Into::into).collect(),
    }
}

/// Creates a record set; fails at the service if it already exists.
pub fn create_rrset<R: Into<Record>>(
    name: Name,
    record_type: &str,
    records: impl IntoIterator<Item = R>,
) -> ChangeRequest {
    change(ChangeAction::Create, name, record_type, records)
}

/// Deletes a record set; the records must match the current ones exactly.
pub fn delete_rrset<R: Into<Record>>(
    name: Name,
    record_type: &str,
    records: impl IntoIterator<Item = R>,
) -> ChangeRequest {
    change(ChangeAction::Delete, name, record_type, records)
}

/// Creates the record set, or replaces it if it already exists.
pub fn upsert_rrset<R: Into<Record>>(
    name: Name,
    record_type: &str,
    records: impl IntoIterator<Item = R>,
) -> ChangeRequest {
    change(ChangeAction::Upsert, name, record_type, records)
}

/// Alias record sets are not supported.
pub fn create_alias_rrset(name: &Name, record_type: &str) -> Result<ChangeRequest> {
    unsupported("create_alias_rrset", name, record_type)
}

/// Failover record sets are not supported.
pub fn create_failover_rrset(name: &Name, record_type: &str) -> Result<ChangeRequest> {
    unsupported("create_failover_rrset", name, record_type)
}

/// Geolocation record sets are not supported.
pub fn create_geolocation_rrset(name: &Name, record_type: &str) -> Result<ChangeRequest> {
    unsupported("create_geolocation_rrset", name, record_type)
}

/// Latency-based record sets are not supported.
pub fn create_latency_based_rrset(name: &Name, record_type: &str) -> Result<ChangeRequest> {
    unsupported("create_latency_based_rrset", name, record_type)
}

fn unsupported(operation: &str, name: &Name, record_type: &str) -> Result<ChangeRequest> {
    log::warn!("[route53] {operation} requested for {name} {record_type}, not supported");
    Err(Route53Error::UnsupportedOperation {
        operation: operation.to_string(),
    })
}

impl ChangeRequest {
    /// Serializes this change as one `<Change>` element.
    pub fn to_element(&self) -> XmlElement {
        let resource_records = self.records.iter().map(|record| {
            XmlElement::new("ResourceRecord").with_child(XmlElement::leaf("Value", record.encode()))
        });

        XmlElement::new("Change")
            .with_child(XmlElement::leaf("Action", self.action.as_str()))
            .with_child(
                XmlElement::new("ResourceRecordSet")
                    .with_child(XmlElement::leaf("Name", self.name.to_ascii()))
                    .with_child(XmlElement::leaf("Type", self.record_type.as_str()))
                    .with_child(XmlElement::leaf("TTL", CHANGE_TTL.to_string()))
                    .with_child(XmlElement::new("ResourceRecords").with_children(resource_records)),
            )
    }
}
