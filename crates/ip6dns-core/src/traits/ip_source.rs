// # IP Source Trait
//
// Defines the interface for looking up the current public IPv6 address.
//
// ## Implementations
//
// - HTTP GET against an echo service: `ip6dns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ip6dns_core::IpSource;
//
// let source = /* IpSource implementation */;
// let address = source.current().await?;
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// A source performs a single lookup per call. Fallback between sources is
/// owned by [`IpResolver`](crate::resolver::IpResolver), so implementations
/// must not retry on their own.
///
/// The returned address is the raw (whitespace trimmed) answer of the
/// source. It is not parsed or validated as an IPv6 literal.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address as reported by the source
    /// - `Err(Error)`: Network failure, non-success status or unreadable body
    async fn current(&self) -> Result<String, crate::Error>;

    /// Human readable description of the source (for logging)
    fn describe(&self) -> String;
}
