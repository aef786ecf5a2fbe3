use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::records::Record;

// ============ Hosted Zones ============

/// A hosted zone as reported by the service.
///
/// Only produced by decoding a zone creation or listing response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Zone apex, as returned by the service (normally with a trailing dot).
    pub name: String,
    /// Zone id without the `/hostedzone/` prefix; pass this to the other calls.
    pub identifier: String,
    /// Number of record sets in the zone.
    pub rrset_count: u64,
    /// Caller reference the zone was created with.
    pub reference: String,
}

// ============ Record Sets ============

/// Result of listing record sets: every record grouped by owner name.
///
/// Records decoded twice under one name collapse into one set member.
pub type RecordSets = HashMap<Name, HashSet<Record>>;

/// Optional filters for listing record sets.
///
/// Unset or empty values are left out of the query string entirely.
///
/// # Default
///
/// No filters: the service starts at the first record set and uses its own page size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordSetsParams {
    /// Set identifier to start from (weighted/latency/failover sets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Maximum number of record sets in the response; `0` counts as unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    /// Record name to start from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Record type to start from; requires `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
}

impl ListRecordSetsParams {
    /// Query parameters in the order the service documents them.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        [
            ("identifier", self.identifier.clone()),
            ("maxitems", self.max_items.filter(|&n| n > 0).map(|n| n.to_string())),
            ("name", self.name.clone()),
            ("type", self.record_type.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v))
        })
        .collect()
    }
}

// ============ Changes ============

/// What a [`ChangeRequest`] does to its record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mutation inside a change batch.
///
/// Built with [`create_rrset`](crate::create_rrset),
/// [`delete_rrset`](crate::delete_rrset) or [`upsert_rrset`](crate::upsert_rrset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub(crate) action: ChangeAction,
    pub(crate) name: Name,
    pub(crate) record_type: String,
    pub(crate) records: Vec<Record>,
}

impl ChangeRequest {
    pub fn action(&self) -> ChangeAction {
        self.action
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Records in the order they will be sent.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

// ============ Credentials ============

/// AWS credentials used by the default signer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
