// # netcup DNS Provider
//
// This crate provides the netcup CCP DNS API implementation of `DnsApi`.
//
// ## Behavior
//
// - One HTTP POST per trait call, no retries, no caching
// - Strictly typed response decoding: a malformed record set is an error,
//   never a partial result
// - Dry-run mode: login, fetch and logout go out, record submissions are
//   only logged
//
// ## Security Requirements
//
// - API key, password and session id NEVER appear in logs
// - Credentials are provided via configuration only
//
// ## API Reference
//
// - Endpoint: `https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON`
// - Actions: `login`, `logout`, `infoDnsRecords`, `updateDnsRecords`

mod protocol;

use async_trait::async_trait;
use ip6dns_core::config::{Credentials, UpdaterConfig};
use ip6dns_core::traits::{DnsApi, DnsRecord, RecordPayload, SessionToken};
use ip6dns_core::{Error, Result};
use protocol::*;
use serde::Serialize;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// netcup DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the credentials.
pub struct NetcupProvider {
    /// API credentials
    credentials: Credentials,

    /// JSON endpoint
    api_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, skip record submissions
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for NetcupProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupProvider")
            .field("customer_number", &self.credentials.customer_number)
            .field("api_key", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl NetcupProvider {
    /// Create a new netcup provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: customer number, API key and API password
    /// - `api_url`: JSON endpoint
    /// - `dry_run`: If true, log record submissions instead of sending them
    pub fn new(credentials: Credentials, api_url: impl Into<String>, dry_run: bool) -> Result<Self> {
        if credentials.api_key.is_empty() || credentials.customer_number.is_empty() {
            return Err(Error::config_missing("netcup customer number and API key"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            api_url: api_url.into(),
            client,
            dry_run,
        })
    }

    /// Create a provider from the updater configuration
    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        if config.dry_run {
            tracing::warn!("netcup provider running in DRY-RUN mode - no records will be changed");
        }
        Self::new(config.credentials.clone(), config.api_url.clone(), config.dry_run)
    }

    /// Post one action and decode the response envelope
    ///
    /// Connection errors, non-success HTTP statuses, unreadable bodies and
    /// bodies that are not a JSON object are all `Error::Transport`.
    async fn post<P: Serialize>(&self, action: &str, param: P) -> Result<ApiResponse> {
        tracing::debug!("POST action {}", action);

        let response = self
            .client
            .post(&self.api_url)
            .json(&ApiRequest { action, param })
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} request failed: {}", action, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::transport(format!(
                "{} answered with HTTP {}: {}",
                action, status, error_text
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read {} response: {}", action, e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::transport(format!("Failed to parse {} response: {}", action, e)))
    }
}

/// Extract the session id from a login response
fn session_from(response: &ApiResponse) -> Result<SessionToken> {
    match response.data::<LoginData>() {
        Ok(data) => Ok(SessionToken::new(data.apisessionid)),
        Err(e) => {
            tracing::debug!("Login response data did not decode: {}", e);
            Err(Error::login(format!(
                "Could not retrieve the API session id: {}",
                response.describe()
            )))
        }
    }
}

/// Extract the record set from an infoDnsRecords response
fn records_from(response: &ApiResponse) -> Result<Vec<DnsRecord>> {
    if response.is_error() {
        return Err(Error::fetch(response.describe()));
    }

    // An empty zone is only trusted when the data object itself is present
    if !response.responsedata.is_object() {
        return Err(Error::fetch(format!(
            "Response carried no record data ({})",
            response.describe()
        )));
    }

    if !response.has_data_field("dnsrecords") {
        tracing::warn!("Response carried no DNS records ({})", response.describe());
        return Ok(Vec::new());
    }

    response
        .data::<DnsRecordsData>()
        .map(|data| data.dnsrecords)
        .map_err(|e| Error::fetch(format!("Malformed DNS record in response: {}", e)))
}

#[async_trait]
impl DnsApi for NetcupProvider {
    async fn login(&self) -> Result<SessionToken> {
        let param = LoginParam {
            customernumber: &self.credentials.customer_number,
            apikey: &self.credentials.api_key,
            apipassword: &self.credentials.api_password,
        };

        let response = self
            .post(ACTION_LOGIN, param)
            .await
            .map_err(|e| Error::login(e.to_string()))?;

        session_from(&response)
    }

    async fn logout(&self, session: &SessionToken) -> Result<()> {
        let param = LogoutParam {
            customernumber: &self.credentials.customer_number,
            apikey: &self.credentials.api_key,
            apisessionid: session.as_str(),
        };

        let response = self
            .post(ACTION_LOGOUT, param)
            .await
            .map_err(|e| Error::logout(e.to_string()))?;

        if response.is_error() {
            return Err(Error::logout(response.describe()));
        }

        match response.longmessage {
            Some(ref message) => tracing::info!("API logout response: {}", message),
            None => tracing::debug!("Logout response carried no message"),
        }
        Ok(())
    }

    async fn fetch_records(&self, domain: &str, session: &SessionToken) -> Result<Vec<DnsRecord>> {
        let param = InfoDnsRecordsParam {
            domainname: domain,
            customernumber: &self.credentials.customer_number,
            apikey: &self.credentials.api_key,
            apisessionid: session.as_str(),
        };

        let response = self
            .post(ACTION_INFO_DNS_RECORDS, param)
            .await
            .map_err(|e| Error::fetch(e.to_string()))?;

        records_from(&response)
    }

    async fn submit_record(
        &self,
        domain: &str,
        session: &SessionToken,
        record: &RecordPayload,
    ) -> Result<Option<String>> {
        let param = UpdateDnsRecordsParam {
            domainname: domain,
            customernumber: &self.credentials.customer_number,
            apikey: &self.credentials.api_key,
            apisessionid: session.as_str(),
            dnsrecordset: DnsRecordSet {
                dnsrecords: [record],
            },
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} for {}: {}",
                ACTION_UPDATE_DNS_RECORDS,
                domain,
                serde_json::to_string(record)?
            );
            return Ok(None);
        }

        let response = self
            .post(ACTION_UPDATE_DNS_RECORDS, param)
            .await
            .map_err(|e| Error::update(format!("{}: {}", record.hostname, e)))?;

        if response.is_error() {
            return Err(Error::update(format!(
                "{}: {}",
                record.hostname,
                response.describe()
            )));
        }

        Ok(response.longmessage)
    }

    fn provider_name(&self) -> &'static str {
        "netcup"
    }
}
