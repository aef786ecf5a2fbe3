//! Route53 client facade

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::name::Name;
use crate::operation::{self, Operation};
use crate::request::{DEFAULT_REGION, Endpoint, assemble};
use crate::sign::{RequestSigner, SigV4Signer};
use crate::transport::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, ReqwestTransport, SignedRequest, Transport,
};
use crate::types::{ChangeRequest, Credentials, HostedZone, ListRecordSetsParams, RecordSets};

/// Client for the Route53 hosted zone and record set API.
///
/// Each call builds one request, sends it once and decodes the answer. The
/// client holds no per-call state and can be shared between tasks.
///
/// # Construction
///
/// ```rust,no_run
/// use route53_client::{Credentials, Route53Client};
///
/// # fn main() -> route53_client::Result<()> {
/// let client = Route53Client::new(Credentials::new(
///     "your-access-key-id",
///     "your-secret-access-key",
/// ))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Route53Client {
    transport: Arc<dyn Transport>,
    signer: Arc<dyn RequestSigner>,
    endpoint: Endpoint,
    region: String,
}

/// Builder for [`Route53Client`].
pub struct Route53ClientBuilder {
    credentials: Credentials,
    endpoint: Endpoint,
    region: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl Route53ClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: Endpoint::default(),
            region: DEFAULT_REGION.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            transport: None,
            signer: None,
        }
    }

    /// Service endpoint (default: `https://route53.amazonaws.com`).
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Signing region (default: `us-east-1`).
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Connect timeout of the default transport (default: 10s).
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Request timeout of the default transport (default: 30s).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replaces the default transport; the timeouts above are then ignored.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the default SigV4 signer; the credentials are then unused.
    #[must_use]
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the [`Route53Client`] instance.
    pub fn build(self) -> Result<Route53Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                self.connect_timeout,
                self.request_timeout,
            )?),
        };
        let signer = self
            .signer
            .unwrap_or_else(|| Arc::new(SigV4Signer::new(self.credentials)));

        Ok(Route53Client {
            transport,
            signer,
            endpoint: self.endpoint,
            region: self.region,
        })
    }
}

impl Route53Client {
    /// Creates a client with default settings.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: Credentials) -> Route53ClientBuilder {
        Route53ClientBuilder::new(credentials)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Assemble, sign, send, then validate and decode.
    async fn execute<T>(&self, op: Operation<T>) -> Result<T> {
        let (request, handler) = assemble(op, &self.endpoint, &self.region);
        let headers = self.signer.sign(&request)?;
        let signed = SignedRequest { request, headers };

        let response = self.transport.execute(&signed).await?;
        handler.handle(response.status, &response.body)
    }

    /// Creates a hosted zone.
    ///
    /// `caller_reference` must be unique per creation attempt; see
    /// [`new_caller_reference`].
    pub async fn create_hosted_zone(
        &self,
        caller_reference: &str,
        name: &Name,
    ) -> Result<HostedZone> {
        log::info!("[route53] Creating hosted zone {name}");
        let zone = self
            .execute(operation::create_hosted_zone(caller_reference, name)?)
            .await?;
        log::info!("[route53] Created hosted zone {} ({})", zone.name, zone.identifier);
        Ok(zone)
    }

    /// Lists the hosted zones in the first page of results.
    pub async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let zones = self.execute(operation::list_hosted_zones()).await?;
        log::debug!("[route53] Listed {} hosted zones", zones.len());
        Ok(zones)
    }

    /// Deletes a hosted zone by identifier.
    pub async fn delete_hosted_zone(&self, zone_id: &str) -> Result<()> {
        log::info!("[route53] Deleting hosted zone {zone_id}");
        self.execute(operation::delete_hosted_zone(zone_id)).await
    }

    /// Lists record sets, grouped by owner name.
    ///
    /// A record set of a type without a registered decoder fails the whole call.
    pub async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        params: &ListRecordSetsParams,
    ) -> Result<RecordSets> {
        let sets = self
            .execute(operation::list_resource_record_sets(zone_id, params))
            .await?;
        log::debug!(
            "[route53] Listed record sets for {} names in {zone_id}",
            sets.len()
        );
        Ok(sets)
    }

    /// Submits a batch of changes; the service applies all of them or none.
    pub async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        changes: &[ChangeRequest],
    ) -> Result<()> {
        log::info!(
            "[route53] Submitting {} changes to {zone_id}",
            changes.len()
        );
        self.execute(operation::change_resource_record_sets(zone_id, changes)?)
            .await
    }
}

/// Fresh caller reference for [`Route53Client::create_hosted_zone`].
pub fn new_caller_reference() -> String {
    uuid::Uuid::new_v4().to_string()
}
