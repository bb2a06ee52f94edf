// # DNS API Trait
//
// Defines the interface of a session-based DNS provider API.
//
// A run opens one session, reads the full record set of the zone once,
// submits zero or more single-record changes and closes the session.
//
// ## Implementations
//
// - netcup CCP JSON API: `ip6dns-provider-netcup` crate
//
// ## Usage
//
// ```rust,ignore
// use ip6dns_core::DnsApi;
//
// let api = /* DnsApi implementation */;
// let session = api.login().await?;
// let records = api.fetch_records("example.com", &session).await?;
// api.logout(&session).await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record type managed by this system
pub const AAAA: &str = "AAAA";

/// A DNS record as returned by the provider
///
/// Every field is required. A record missing a field, or carrying a field
/// of the wrong JSON type, fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier
    pub id: String,
    /// Subdomain label
    pub hostname: String,
    /// Record type ("A", "AAAA", "MX", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Passthrough, not interpreted
    pub priority: String,
    /// Target of the record
    pub destination: String,
    /// Deletion marker as echoed by the provider
    #[serde(rename = "deleterecord")]
    pub delete_record: bool,
    /// Passthrough, not interpreted
    pub state: String,
}

impl DnsRecord {
    /// Whether this is an AAAA record for `hostname`
    pub fn is_aaaa_for(&self, hostname: &str) -> bool {
        self.hostname == hostname && self.record_type == AAAA
    }
}

/// A single record submitted in an update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Identifier of an existing record (deletions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subdomain label
    pub hostname: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Passthrough priority of an existing record (deletions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Target of the record
    pub destination: String,
    /// Marks the record for deletion
    #[serde(
        rename = "deleterecord",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub delete_record: bool,
}

impl RecordPayload {
    /// Payload creating an AAAA record for `hostname`
    pub fn create(hostname: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            id: None,
            hostname: hostname.into(),
            record_type: AAAA.to_string(),
            priority: None,
            destination: destination.into(),
            delete_record: false,
        }
    }

    /// Payload deleting an existing record
    ///
    /// The payload mirrors the stored record, including its current
    /// destination.
    pub fn delete(record: &DnsRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            hostname: record.hostname.clone(),
            record_type: record.record_type.clone(),
            priority: Some(record.priority.clone()),
            destination: record.destination.clone(),
            delete_record: true,
        }
    }
}

/// Opaque session identifier returned by login
///
/// The Debug implementation does not expose the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a session identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw identifier, for building requests
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<REDACTED>)")
    }
}

/// Trait for session-based DNS API implementations
///
/// Implementations translate each call into exactly one API request. They
/// do not retry, cache records or decide whether a change is needed; the
/// [`Reconciler`](crate::engine::Reconciler) owns that decision.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Open a session
    ///
    /// # Returns
    ///
    /// - `Ok(SessionToken)`: The session id from the login response
    /// - `Err(Error::LoginFailed)`: Request failed or the response had no session id
    async fn login(&self) -> Result<SessionToken, crate::Error>;

    /// Close a session
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Logout request went through
    /// - `Err(Error::LogoutFailed)`: Request failed
    async fn logout(&self, session: &SessionToken) -> Result<(), crate::Error>;

    /// Fetch every record of a zone
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: The records in provider order
    /// - `Err(Error::FetchFailed)`: Request failed or any record was malformed
    async fn fetch_records(
        &self,
        domain: &str,
        session: &SessionToken,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Submit a single record change (create, or delete when flagged)
    ///
    /// # Returns
    ///
    /// - `Ok(Option<String>)`: The provider's status message, if any
    /// - `Err(Error::UpdateFailed)`: Request failed or was rejected
    async fn submit_record(
        &self,
        domain: &str,
        session: &SessionToken,
        record: &RecordPayload,
    ) -> Result<Option<String>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
