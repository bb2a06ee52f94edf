//! Core traits for the updater
//!
//! - [`IpSource`]: Look up the current public IPv6 address
//! - [`DnsApi`]: Session-based access to the provider's records

pub mod ip_source;
pub mod dns_api;

pub use ip_source::IpSource;
pub use dns_api::{DnsApi, DnsRecord, RecordPayload, SessionToken, AAAA};
