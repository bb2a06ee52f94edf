//! IPv6 address resolution with a single fallback
//!
//! The resolver asks the primary source once. If that fails it asks the
//! secondary source once. There are no further retries: the next scheduled
//! run is the retry mechanism.

use crate::error::{Error, Result};
use crate::traits::IpSource;
use tracing::{info, warn};

/// Resolves the public IPv6 address from two sources
pub struct IpResolver {
    primary: Box<dyn IpSource>,
    secondary: Box<dyn IpSource>,
}

impl IpResolver {
    /// Create a resolver from a primary and a fallback source
    pub fn new(primary: Box<dyn IpSource>, secondary: Box<dyn IpSource>) -> Self {
        Self { primary, secondary }
    }

    /// Resolve the current address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Address from the primary, or from the secondary if the primary failed
    /// - `Err(Error::NoAddressAvailable)`: Both sources failed
    pub async fn resolve_ipv6(&self) -> Result<String> {
        info!("Fetching public IPv6 address from {}", self.primary.describe());

        let primary_err = match self.primary.current().await {
            Ok(address) => return Ok(address),
            Err(e) => e,
        };

        warn!(
            "Primary IP source failed ({}), retrying with {}",
            primary_err,
            self.secondary.describe()
        );

        match self.secondary.current().await {
            Ok(address) => Ok(address),
            Err(secondary_err) => Err(Error::no_address(format!(
                "{}: {}; {}: {}",
                self.primary.describe(),
                primary_err,
                self.secondary.describe(),
                secondary_err
            ))),
        }
    }
}
