//! Record reconciliation
//!
//! Diffing is split from execution: [`plan`] is a pure function over the
//! fetched record set, [`Reconciler::reconcile`] walks the plan and submits
//! the changes one record at a time.
//!
//! The provider cannot edit a record in place. A stale record is replaced by
//! deleting it first and then creating the corrected one, so two AAAA
//! records for the same host never coexist at the provider.

use crate::error::{Error, Result};
use crate::traits::{DnsApi, DnsRecord, RecordPayload, SessionToken};
use tracing::{debug, info};

/// What has to happen for one desired host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlan {
    /// No AAAA record exists, create one
    Create {
        /// Host to create
        hostname: String,
    },
    /// The AAAA record already points at the target
    Unchanged {
        /// Host that is already correct
        hostname: String,
    },
    /// The AAAA record points elsewhere, delete and recreate it
    Replace {
        /// The record found at the provider
        stale: DnsRecord,
    },
}

/// Result of reconciling one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    /// Record was created (didn't exist before)
    Created {
        /// Host name
        hostname: String,
        /// The new destination
        address: String,
    },
    /// Record already had the correct destination (no-op)
    Unchanged {
        /// Host name
        hostname: String,
        /// The current destination
        address: String,
    },
    /// Record was deleted and recreated with a new destination
    Replaced {
        /// Host name
        hostname: String,
        /// The previous destination
        previous: String,
        /// The new destination
        address: String,
    },
}

impl HostOutcome {
    /// The host this outcome belongs to
    pub fn hostname(&self) -> &str {
        match self {
            HostOutcome::Created { hostname, .. }
            | HostOutcome::Unchanged { hostname, .. }
            | HostOutcome::Replaced { hostname, .. } => hostname,
        }
    }

    /// Whether the provider was changed for this host
    pub fn is_change(&self) -> bool {
        !matches!(self, HostOutcome::Unchanged { .. })
    }
}

/// Compute the per-host plan
///
/// For each desired host, in order, the first AAAA record with a matching
/// hostname is authoritative. Later duplicates and records of other types
/// are ignored.
pub fn plan(desired: &[String], target: &str, existing: &[DnsRecord]) -> Vec<HostPlan> {
    desired
        .iter()
        .map(|host| match existing.iter().find(|r| r.is_aaaa_for(host)) {
            None => HostPlan::Create {
                hostname: host.clone(),
            },
            Some(record) if record.destination == target => HostPlan::Unchanged {
                hostname: host.clone(),
            },
            Some(record) => HostPlan::Replace {
                stale: record.clone(),
            },
        })
        .collect()
}

/// Applies the plan for one zone through a [`DnsApi`]
pub struct Reconciler<'a> {
    api: &'a dyn DnsApi,
    domain: &'a str,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `domain`
    pub fn new(api: &'a dyn DnsApi, domain: &'a str) -> Self {
        Self { api, domain }
    }

    /// Converge the desired hosts onto `target`
    ///
    /// Hosts are processed in order. The first failed submission aborts the
    /// whole reconciliation; hosts handled before it stay changed.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<HostOutcome>)`: One outcome per desired host
    /// - `Err(Error::UpdateFailed)`: A submission failed
    pub async fn reconcile(
        &self,
        desired: &[String],
        target: &str,
        existing: &[DnsRecord],
        session: &SessionToken,
    ) -> Result<Vec<HostOutcome>> {
        let mut outcomes = Vec::with_capacity(desired.len());

        for step in plan(desired, target, existing) {
            let outcome = match step {
                HostPlan::Unchanged { hostname } => {
                    info!("{}: AAAA record already points to {}", hostname, target);
                    HostOutcome::Unchanged {
                        hostname,
                        address: target.to_string(),
                    }
                }
                HostPlan::Create { hostname } => {
                    info!("{}: no AAAA record, creating one -> {}", hostname, target);
                    self.submit(session, &RecordPayload::create(&hostname, target))
                        .await?;
                    HostOutcome::Created {
                        hostname,
                        address: target.to_string(),
                    }
                }
                HostPlan::Replace { stale } => {
                    info!(
                        "{}: updating AAAA record {} -> {}",
                        stale.hostname, stale.destination, target
                    );
                    self.submit(session, &RecordPayload::delete(&stale)).await?;
                    self.submit(session, &RecordPayload::create(&stale.hostname, target))
                        .await?;
                    HostOutcome::Replaced {
                        hostname: stale.hostname,
                        previous: stale.destination,
                        address: target.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn submit(&self, session: &SessionToken, record: &RecordPayload) -> Result<()> {
        debug!(
            "Submitting {} {} record for {}",
            if record.delete_record { "delete of" } else { "new" },
            record.record_type,
            record.hostname
        );

        match self.api.submit_record(self.domain, session, record).await {
            Ok(Some(message)) => {
                info!("Update response: {}", message);
                Ok(())
            }
            Ok(None) => {
                debug!("Update response carried no message");
                Ok(())
            }
            Err(e @ Error::UpdateFailed(_)) => Err(e),
            Err(e) => Err(Error::update(format!("{}: {}", record.hostname, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, hostname: &str, record_type: &str, destination: &str) -> DnsRecord {
        DnsRecord {
            id: id.to_string(),
            hostname: hostname.to_string(),
            record_type: record_type.to_string(),
            priority: "0".to_string(),
            destination: destination.to_string(),
            delete_record: false,
            state: "yes".to_string(),
        }
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_covers_all_cases() {
        let existing = vec![
            record("1", "same", "AAAA", "2001:db8::42"),
            record("2", "stale", "AAAA", "2001:db8::1"),
            record("3", "v4only", "A", "192.0.2.1"),
        ];

        let steps = plan(
            &hosts(&["same", "stale", "v4only", "missing"]),
            "2001:db8::42",
            &existing,
        );

        assert_eq!(
            steps,
            vec![
                HostPlan::Unchanged {
                    hostname: "same".to_string()
                },
                HostPlan::Replace {
                    stale: existing[1].clone()
                },
                HostPlan::Create {
                    hostname: "v4only".to_string()
                },
                HostPlan::Create {
                    hostname: "missing".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_plan_first_match_wins() {
        let existing = vec![
            record("1", "www", "AAAA", "2001:db8::42"),
            record("2", "www", "AAAA", "2001:db8::dead"),
        ];

        let steps = plan(&hosts(&["www"]), "2001:db8::42", &existing);
        assert_eq!(
            steps,
            vec![HostPlan::Unchanged {
                hostname: "www".to_string()
            }]
        );

        // Same duplicates, reversed: the stale one is now authoritative
        let reversed: Vec<_> = existing.into_iter().rev().collect();
        let steps = plan(&hosts(&["www"]), "2001:db8::42", &reversed);
        assert_eq!(
            steps,
            vec![HostPlan::Replace {
                stale: reversed[0].clone()
            }]
        );
    }

    #[test]
    fn test_plan_preserves_host_order() {
        let steps = plan(&hosts(&["b", "a", "c"]), "2001:db8::42", &[]);
        let order: Vec<_> = steps
            .iter()
            .map(|s| match s {
                HostPlan::Create { hostname } => hostname.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_outcome_helpers() {
        let unchanged = HostOutcome::Unchanged {
            hostname: "www".to_string(),
            address: "2001:db8::42".to_string(),
        };
        let created = HostOutcome::Created {
            hostname: "api".to_string(),
            address: "2001:db8::42".to_string(),
        };
        assert_eq!(unchanged.hostname(), "www");
        assert!(!unchanged.is_change());
        assert!(created.is_change());
    }
}
