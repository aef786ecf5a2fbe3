//! # route53-client
//!
//! Protocol client for the Route53 hosted zone and resource record set API
//! (version `2013-04-01`).
//!
//! ## Supported Operations
//!
//! | Operation | Method | Success status |
//! |-----------|--------|----------------|
//! | [`create_hosted_zone`](Route53Client::create_hosted_zone) | `POST /hostedzone` | 201 |
//! | [`list_hosted_zones`](Route53Client::list_hosted_zones) | `GET /hostedzone` | 200 |
//! | [`delete_hosted_zone`](Route53Client::delete_hosted_zone) | `DELETE /hostedzone/{id}` | 200 |
//! | [`list_resource_record_sets`](Route53Client::list_resource_record_sets) | `GET /hostedzone/{id}/rrset` | 200 |
//! | [`change_resource_record_sets`](Route53Client::change_resource_record_sets) | `POST /hostedzone/{id}/rrset` | 200 |
//!
//! Record values are decoded for `SOA`, `NS` and `CNAME`. Listing a zone that
//! contains any other type fails with [`Route53Error::UnrecognizedRecordType`].
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use route53_client::{
//!     Credentials, ListRecordSetsParams, Name, Ns, Route53Client, create_rrset,
//!     new_caller_reference,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Route53Client::new(Credentials::new("AKID", "SECRET"))?;
//!
//!     // 1. Create a zone
//!     let apex = Name::new("example.com.")?;
//!     let zone = client.create_hosted_zone(&new_caller_reference(), &apex).await?;
//!
//!     // 2. Add a delegation
//!     let change = create_rrset(
//!         Name::new("sub.example.com.")?,
//!         "NS",
//!         [Ns { nameserver: Name::new("ns1.example.net.")? }],
//!     );
//!     client
//!         .change_resource_record_sets(&zone.identifier, &[change])
//!         .await?;
//!
//!     // 3. Read it back
//!     let sets = client
//!         .list_resource_record_sets(&zone.identifier, &ListRecordSetsParams::default())
//!         .await?;
//!     for (name, records) in &sets {
//!         for record in records {
//!             println!("{name} {} {record}", record.record_type());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, Route53Error>`](Route53Error). Nothing
//! is retried internally; [`Route53Error::is_transient`] tells whether a retry
//! could help.

mod change;
mod client;
mod decode;
mod error;
mod name;
mod operation;
mod records;
mod request;
mod sign;
mod transport;
mod types;
mod utils;
mod xml;

// Re-export error types
pub use error::{Result, Route53Error};

// Re-export the client
pub use client::{Route53Client, Route53ClientBuilder, new_caller_reference};

// Re-export change factories
pub use change::{
    CHANGE_TTL, create_alias_rrset, create_failover_rrset, create_geolocation_rrset,
    create_latency_based_rrset, create_rrset, delete_rrset, upsert_rrset,
};

// Re-export domain types
pub use name::Name;
pub use records::{Cname, Ns, Record, RecordCodec, Soa, supported_record_types};
pub use types::{
    ChangeAction, ChangeRequest, Credentials, HostedZone, ListRecordSetsParams, RecordSets,
};

// Re-export the request pipeline for custom transports and signers
pub use operation::{API_VERSION, Operation, ResponseDecoder, ResponseHandler, XMLNS};
pub use request::{Endpoint, PreparedRequest, assemble, content_sha256};
pub use sign::{RequestSigner, SigV4Signer};
pub use transport::{RawResponse, ReqwestTransport, SignedRequest, Transport};

// Re-export the XML tree for building and inspecting bodies
pub use xml::XmlElement;
