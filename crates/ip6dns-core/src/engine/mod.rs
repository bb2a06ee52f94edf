//! Update run orchestration
//!
//! An [`Updater`] performs one complete run:
//!
//! ```text
//! Init ─► AddressResolved ─► SessionOpen ─► RecordsFetched ─► Reconciling ─► SessionClosed ─► Done
//!   │            │                 │               │                │
//!   └────────────┴─────────────────┴───────────────┴────────────────┴──► Failed
//! ```
//!
//! Two edges leave the straight line. A failed logout after reconciling goes
//! from `Reconciling` directly to `Done`, since the session was never
//! confirmed closed. A failed run whose logout still succeeds passes through
//! `SessionClosed` on its way to `Failed`.
//!
//! The address is resolved before logging in, so an IP discovery failure
//! never opens a session. Once a session is open it is closed exactly once,
//! on the success path and on the failure path.
//!
//! A failed logout after a successful reconciliation does not discard the
//! run. It is recorded in [`RunSummary::logout_error`] and left to the
//! caller to report.

mod reconcile;

pub use reconcile::{plan, HostOutcome, HostPlan, Reconciler};

use crate::config::UpdaterConfig;
use crate::error::{Error, Result};
use crate::resolver::IpResolver;
use crate::traits::{DnsApi, SessionToken};
use tracing::{debug, error, info, warn};

/// Phases of a single update run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Nothing done yet
    Init,
    /// Public address known
    AddressResolved,
    /// Logged in
    SessionOpen,
    /// Record snapshot taken
    RecordsFetched,
    /// Submitting changes
    Reconciling,
    /// Logged out
    SessionClosed,
    /// Run finished
    Done,
    /// Run aborted
    Failed,
}

/// Result of a completed run
#[derive(Debug)]
pub struct RunSummary {
    /// The address every host was converged onto
    pub address: String,

    /// One outcome per configured host, in configuration order
    pub outcomes: Vec<HostOutcome>,

    /// Set if the session could not be closed after the update
    pub logout_error: Option<Error>,
}

impl RunSummary {
    /// Number of hosts whose records were changed
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_change()).count()
    }

    /// Whether the run finished without any error, logout included
    pub fn is_clean(&self) -> bool {
        self.logout_error.is_none()
    }
}

/// Runs resolve → login → fetch → reconcile → logout
pub struct Updater {
    resolver: IpResolver,
    api: Box<dyn DnsApi>,
    domain: String,
    hosts: Vec<String>,
}

impl Updater {
    /// Create a new updater
    ///
    /// # Parameters
    ///
    /// - `resolver`: IPv6 resolver with its two sources
    /// - `api`: DNS API implementation
    /// - `config`: Updater configuration (domain and hosts are taken from it)
    pub fn new(resolver: IpResolver, api: Box<dyn DnsApi>, config: &UpdaterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver,
            api,
            domain: config.domain.clone(),
            hosts: config.hosts.clone(),
        })
    }

    /// Perform one run
    ///
    /// # Returns
    ///
    /// - `Ok(RunSummary)`: Every host converged (the logout may still have failed)
    /// - `Err(Error)`: The first fatal error; later phases were skipped
    pub async fn run(&self) -> Result<RunSummary> {
        let mut trace = PhaseTrace::new();

        let address = match self.resolver.resolve_ipv6().await {
            Ok(address) => address,
            Err(e) => return Err(trace.fail(e)),
        };
        info!("Found public IPv6 address {}", address);
        trace.enter(RunPhase::AddressResolved);

        info!("Logging in to {}", self.api.provider_name());
        let session = match self.api.login().await {
            Ok(session) => session,
            Err(e) => return Err(trace.fail(e)),
        };
        info!("Successfully logged in");
        trace.enter(RunPhase::SessionOpen);

        let result = self.update_in_session(&session, &address, &mut trace).await;

        info!("Logging out");
        let logout = self.api.logout(&session).await;

        conclude(&mut trace, address, result, logout)
    }

    async fn update_in_session(
        &self,
        session: &SessionToken,
        address: &str,
        trace: &mut PhaseTrace,
    ) -> Result<Vec<HostOutcome>> {
        let records = self.api.fetch_records(&self.domain, session).await?;
        info!("Fetched {} DNS record(s) for {}", records.len(), self.domain);
        trace.enter(RunPhase::RecordsFetched);

        trace.enter(RunPhase::Reconciling);
        Reconciler::new(self.api.as_ref(), &self.domain)
            .reconcile(&self.hosts, address, &records, session)
            .await
    }
}

/// Settle the run once the logout attempt is done
fn conclude(
    trace: &mut PhaseTrace,
    address: String,
    result: Result<Vec<HostOutcome>>,
    logout: Result<()>,
) -> Result<RunSummary> {
    match (result, logout) {
        (Ok(outcomes), Ok(())) => {
            trace.enter(RunPhase::SessionClosed);
            trace.enter(RunPhase::Done);
            Ok(RunSummary {
                address,
                outcomes,
                logout_error: None,
            })
        }
        (Ok(outcomes), Err(logout_err)) => {
            warn!("DNS records are up to date but logout failed: {}", logout_err);
            trace.enter(RunPhase::Done);
            Ok(RunSummary {
                address,
                outcomes,
                logout_error: Some(logout_err),
            })
        }
        (Err(e), logout) => {
            error!("Run failed during {:?}: {}", trace.current(), e);
            match logout {
                Ok(()) => trace.enter(RunPhase::SessionClosed),
                Err(logout_err) => warn!("Logout after failed run also failed: {}", logout_err),
            }
            trace.enter(RunPhase::Failed);
            Err(e)
        }
    }
}

/// Phases a run has passed through, current one last
#[derive(Debug)]
struct PhaseTrace {
    current: RunPhase,
    history: Vec<RunPhase>,
}

impl PhaseTrace {
    fn new() -> Self {
        Self {
            current: RunPhase::Init,
            history: vec![RunPhase::Init],
        }
    }

    fn current(&self) -> RunPhase {
        self.current
    }

    fn enter(&mut self, next: RunPhase) {
        debug!("Run phase {:?} -> {:?}", self.current, next);
        self.current = next;
        self.history.push(next);

        if matches!(next, RunPhase::Done | RunPhase::Failed) {
            debug!("Run phases: {:?}", self.history);
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        error!("Run failed during {:?}: {}", self.current, err);
        self.enter(RunPhase::Failed);
        err
    }
}
