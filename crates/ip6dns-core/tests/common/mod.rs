//! Test doubles and common utilities for the contract tests
//!
//! The doubles record every call so tests can assert on exactly which
//! requests a run would have sent, and in which order.

#![allow(dead_code)]

use ip6dns_core::error::{Error, Result};
use ip6dns_core::traits::{DnsApi, DnsRecord, IpSource, RecordPayload, SessionToken};
use ip6dns_core::{Credentials, IpResolver, UpdaterConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IP source that always answers with the same address
#[derive(Clone)]
pub struct StaticIpSource {
    address: String,
    calls: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.address.clone())
    }

    fn describe(&self) -> String {
        format!("static({})", self.address)
    }
}

/// An IP source that simulates a network error
#[derive(Clone)]
pub struct FailingIpSource {
    calls: Arc<AtomicUsize>,
}

impl FailingIpSource {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::transport("simulated network error"))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

/// A call received by [`MockDnsApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Login,
    FetchRecords { domain: String },
    Submit { domain: String, record: RecordPayload },
    Logout,
}

/// A DnsApi that records calls and serves a fixed record set
///
/// Clones share the call log, so a test can keep one handle and box the
/// other into the code under test.
#[derive(Clone, Default)]
pub struct MockDnsApi {
    calls: Arc<Mutex<Vec<ApiCall>>>,
    records: Vec<DnsRecord>,
    login_fails: bool,
    fetch_fails: bool,
    logout_fails: bool,
    /// Zero-based index of the submission that fails
    failing_submission: Option<usize>,
}

impl MockDnsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, records: Vec<DnsRecord>) -> Self {
        self.records = records;
        self
    }

    /// Login answers without a session id
    pub fn failing_login(mut self) -> Self {
        self.login_fails = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fetch_fails = true;
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn failing_submission(mut self, index: usize) -> Self {
        self.failing_submission = Some(index);
        self
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The submitted records, in order
    pub fn submissions(&self) -> Vec<RecordPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Submit { record, .. } => Some(record),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl DnsApi for MockDnsApi {
    async fn login(&self) -> Result<SessionToken> {
        self.record(ApiCall::Login);
        if self.login_fails {
            return Err(Error::login(
                "response carried no responsedata.apisessionid (The login has failed)",
            ));
        }
        Ok(SessionToken::new("test-session"))
    }

    async fn logout(&self, session: &SessionToken) -> Result<()> {
        assert_eq!(session.as_str(), "test-session");
        self.record(ApiCall::Logout);
        if self.logout_fails {
            return Err(Error::logout("simulated network error"));
        }
        Ok(())
    }

    async fn fetch_records(&self, domain: &str, session: &SessionToken) -> Result<Vec<DnsRecord>> {
        assert_eq!(session.as_str(), "test-session");
        self.record(ApiCall::FetchRecords {
            domain: domain.to_string(),
        });
        if self.fetch_fails {
            return Err(Error::fetch("simulated network error"));
        }
        Ok(self.records.clone())
    }

    async fn submit_record(
        &self,
        domain: &str,
        session: &SessionToken,
        record: &RecordPayload,
    ) -> Result<Option<String>> {
        assert_eq!(session.as_str(), "test-session");
        let index = self.submissions().len();
        self.record(ApiCall::Submit {
            domain: domain.to_string(),
            record: record.clone(),
        });
        if self.failing_submission == Some(index) {
            return Err(Error::transport("simulated network error"));
        }
        Ok(Some("DNS records successful updated".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build an existing provider record
pub fn record(id: &str, hostname: &str, record_type: &str, destination: &str) -> DnsRecord {
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

/// Helper to turn string literals into a host list
pub fn hosts(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Helper to create a minimal UpdaterConfig for testing
pub fn minimal_config(host_names: &[&str]) -> UpdaterConfig {
    UpdaterConfig::new(
        Credentials::new("12345", "test-key", "test-password"),
        "example.com",
        hosts(host_names),
    )
}

/// Resolver whose primary source answers with `address`
pub fn static_resolver(address: &str) -> IpResolver {
    IpResolver::new(
        Box::new(StaticIpSource::new(address)),
        Box::new(FailingIpSource::new()),
    )
}
