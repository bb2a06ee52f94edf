// # ip6dns-core
//
// Core library for the IPv6 dynamic DNS updater.
//
// ## Architecture Overview
//
// One run points a list of hostnames at the machine's public IPv6 address:
// - **IpSource**: Trait for looking up the public address
// - **IpResolver**: Primary source with a single fallback source
// - **DnsApi**: Trait for a session-based provider API (login, fetch, submit, logout)
// - **Reconciler**: Diffs the fetched records against the desired hosts and submits changes
// - **Updater**: Orchestrates one run and guarantees the session is closed
//
// ## Design Principles
//
// 1. **Library-First**: Provider and IP source crates plug in through the traits
// 2. **Explicit Configuration**: `UpdaterConfig` is built once and passed down
// 3. **Fail Fast**: Every error ends the run, the next scheduled run is the retry
// 4. **Stateless**: Each run starts from a fresh read of the provider's records

pub mod traits;
pub mod engine;
pub mod resolver;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsApi, DnsRecord, IpSource, RecordPayload, SessionToken};
pub use engine::{HostOutcome, Reconciler, RunPhase, RunSummary, Updater};
pub use resolver::IpResolver;
pub use config::{Credentials, IpSourcesConfig, UpdaterConfig};
pub use error::{Error, Result};
