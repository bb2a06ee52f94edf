//! Configuration types for the updater
//!
//! The configuration is built once at startup and handed to each component
//! by reference. Nothing in the crate reads process-wide state.

use serde::{Deserialize, Serialize};

/// Default JSON endpoint of the netcup CCP DNS API
pub const DEFAULT_API_URL: &str = "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

/// Default primary IPv6 discovery endpoint
pub const DEFAULT_PRIMARY_IP_URL: &str = "https://ip6.seeip.org";

/// Default secondary IPv6 discovery endpoint
pub const DEFAULT_SECONDARY_IP_URL: &str = "https://v6.ident.me/";

/// Main updater configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// API credentials
    pub credentials: Credentials,

    /// Zone whose records are managed (e.g. "example.com")
    pub domain: String,

    /// Hostnames to point at the current address, processed in order
    pub hosts: Vec<String>,

    /// DNS API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// IP discovery endpoints
    #[serde(default)]
    pub ip_sources: IpSourcesConfig,

    /// Log submissions instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl UpdaterConfig {
    /// Create a configuration with default endpoints
    pub fn new(credentials: Credentials, domain: impl Into<String>, hosts: Vec<String>) -> Self {
        Self {
            credentials,
            domain: domain.into(),
            hosts,
            api_url: default_api_url(),
            ip_sources: IpSourcesConfig::default(),
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;

        if self.domain.trim().is_empty() {
            return Err(crate::Error::config_missing("domain"));
        }

        if self.hosts.is_empty() {
            return Err(crate::Error::config_missing("hosts (list is empty)"));
        }

        if let Some(pos) = self.hosts.iter().position(|h| h.trim().is_empty()) {
            return Err(crate::Error::invalid_config(format!(
                "host entry {} is empty",
                pos
            )));
        }

        validate_url("api_url", &self.api_url)?;
        self.ip_sources.validate()?;

        Ok(())
    }
}

/// Credentials for the DNS API
///
/// The Debug implementation does not expose the key or the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Customer number
    pub customer_number: String,
    /// API key
    pub api_key: String,
    /// API password, only sent on login
    pub api_password: String,
}

impl Credentials {
    /// Create a new set of credentials
    pub fn new(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Self {
        Self {
            customer_number: customer_number.into(),
            api_key: api_key.into(),
            api_password: api_password.into(),
        }
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if self.customer_number.is_empty() {
            return Err(crate::Error::config_missing("customer number"));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config_missing("API key"));
        }
        if self.api_password.is_empty() {
            return Err(crate::Error::config_missing("API password"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("customer_number", &self.customer_number)
            .field("api_key", &"<REDACTED>")
            .field("api_password", &"<REDACTED>")
            .finish()
    }
}

/// IP discovery endpoints, tried in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourcesConfig {
    /// URL tried first
    #[serde(default = "default_primary_ip_url")]
    pub primary_url: String,

    /// URL tried once if the primary fails
    #[serde(default = "default_secondary_ip_url")]
    pub secondary_url: String,
}

impl IpSourcesConfig {
    /// Validate both URLs
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_url("primary IP source", &self.primary_url)?;
        validate_url("secondary IP source", &self.secondary_url)
    }
}

impl Default for IpSourcesConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_ip_url(),
            secondary_url: default_secondary_ip_url(),
        }
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config_missing(what.to_string()));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::invalid_config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_primary_ip_url() -> String {
    DEFAULT_PRIMARY_IP_URL.to_string()
}

fn default_secondary_ip_url() -> String {
    DEFAULT_SECONDARY_IP_URL.to_string()
}
