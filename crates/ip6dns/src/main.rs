// # ip6dns - IPv6 dynamic DNS updater
//
// One-shot updater meant to be run periodically (cron, systemd timer).
// Each run:
// 1. Reads configuration from environment variables
// 2. Resolves the public IPv6 address
// 3. Logs in to the netcup DNS API and reads the zone's records
// 4. Points every configured host's AAAA record at the address
// 5. Logs out
//
// This binary is a thin integration layer; all update logic lives in
// ip6dns-core.
//
// ## Configuration
//
// ### Required
// - `CUSTOMERNR`: netcup customer number
// - `APIKEY`: API key
// - `APIPASSWORD`: API password
// - `DOMAIN`: Zone to manage
// - `HOSTS`: Comma-separated list of hosts to manage
//
// ### Optional
// - `APIURL`: API endpoint (default: netcup JSON endpoint)
// - `IPV6_PRIMARY_URL`: First IPv6 lookup service (default: https://ip6.seeip.org)
// - `IPV6_SECONDARY_URL`: Fallback IPv6 lookup service (default: https://v6.ident.me/)
// - `DDNS_MODE`: Set to `dry-run` to log record changes instead of sending them
// - `LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Example
//
// ```bash
// export CUSTOMERNR=12345
// export APIKEY=your_key
// export APIPASSWORD=your_password
// export DOMAIN=example.com
// export HOSTS=@,www
//
// ip6dns
// ```

use anyhow::{Context, Result};
use ip6dns_core::config::{DEFAULT_API_URL, DEFAULT_PRIMARY_IP_URL, DEFAULT_SECONDARY_IP_URL};
use ip6dns_core::{Credentials, HostOutcome, IpSourcesConfig, RunSummary, Updater, UpdaterConfig};
use ip6dns_ip_http::resolver_from_config;
use ip6dns_provider_netcup::NetcupProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterExitCode {
    /// All hosts up to date, session closed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The run failed (IP discovery, login, fetch or update)
    RuntimeError = 2,
    /// All hosts up to date, but the session could not be closed
    LogoutFailed = 3,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    customer_number: String,
    api_key: String,
    api_password: String,
    domain: String,
    hosts: Vec<String>,
    api_url: String,
    ip_primary_url: String,
    ip_secondary_url: String,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} not set. Set it via: export {}=...", key, key))
        };
        let optional = |key: &str, fallback: &str| -> String {
            match lookup(key).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => fallback.to_string(),
            }
        };

        Ok(Self {
            customer_number: required("CUSTOMERNR")?,
            api_key: required("APIKEY")?,
            api_password: required("APIPASSWORD")?,
            domain: required("DOMAIN")?,
            hosts: required("HOSTS")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            api_url: optional("APIURL", DEFAULT_API_URL),
            ip_primary_url: optional("IPV6_PRIMARY_URL", DEFAULT_PRIMARY_IP_URL),
            ip_secondary_url: optional("IPV6_SECONDARY_URL", DEFAULT_SECONDARY_IP_URL),
            dry_run: optional("DDNS_MODE", "live").to_lowercase() == "dry-run",
            log_level: optional("LOG_LEVEL", "info"),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            anyhow::bail!(
                "HOSTS must contain at least one host. \
                Set it via: export HOSTS=@,www"
            );
        }

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        self.to_updater_config()
            .validate()
            .context("Configuration validation failed")
    }

    /// Build the immutable configuration handed to the library
    fn to_updater_config(&self) -> UpdaterConfig {
        UpdaterConfig {
            credentials: Credentials::new(
                self.customer_number.clone(),
                self.api_key.clone(),
                self.api_password.clone(),
            ),
            domain: self.domain.clone(),
            hosts: self.hosts.clone(),
            api_url: self.api_url.clone(),
            ip_sources: IpSourcesConfig {
                primary_url: self.ip_primary_url.clone(),
                secondary_url: self.ip_secondary_url.clone(),
            },
            dry_run: self.dry_run,
        }
    }
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    info!("Starting IPv6 DNS updater");
    info!(
        "Configuration loaded: {} host(s) in {}",
        config.hosts.len(),
        config.domain
    );

    // Everything runs sequentially, a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run_updater(config.to_updater_config())).into()
}

/// Run one update and map the result to an exit code
async fn run_updater(config: UpdaterConfig) -> UpdaterExitCode {
    let provider = match NetcupProvider::from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to set up DNS provider: {}", e);
            return UpdaterExitCode::ConfigError;
        }
    };

    let resolver = resolver_from_config(&config.ip_sources);

    let updater = match Updater::new(resolver, Box::new(provider), &config) {
        Ok(updater) => updater,
        Err(e) => {
            error!("Failed to set up updater: {}", e);
            return UpdaterExitCode::ConfigError;
        }
    };

    match updater.run().await {
        Ok(summary) => report(&summary),
        Err(e) => {
            error!("Exiting. {}", e);
            UpdaterExitCode::RuntimeError
        }
    }
}

/// Log the per-host outcome and pick the exit code
fn report(summary: &RunSummary) -> UpdaterExitCode {
    for outcome in &summary.outcomes {
        match outcome {
            HostOutcome::Created { hostname, address } => {
                info!("{}: created AAAA -> {}", hostname, address)
            }
            HostOutcome::Replaced {
                hostname,
                previous,
                address,
            } => info!("{}: updated AAAA {} -> {}", hostname, previous, address),
            HostOutcome::Unchanged { hostname, .. } => info!("{}: unchanged", hostname),
        }
    }

    match &summary.logout_error {
        None => {
            info!(
                "Updater finished successfully ({} of {} host(s) changed)",
                summary.changed_count(),
                summary.outcomes.len()
            );
            UpdaterExitCode::Success
        }
        Some(e) => {
            warn!("DNS records were updated, but {}", e);
            UpdaterExitCode::LogoutFailed
        }
    }
}
