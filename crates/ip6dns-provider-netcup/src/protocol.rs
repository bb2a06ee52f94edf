//! Wire types of the netcup CCP JSON API
//!
//! Every request is `{"action": ..., "param": {...}}` posted to a single
//! endpoint. Every response carries `status`, `statuscode`, `longmessage` and
//! an action-specific `responsedata`, which is an empty string when the
//! action failed.

use ip6dns_core::traits::{DnsRecord, RecordPayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub(crate) const ACTION_LOGIN: &str = "login";
pub(crate) const ACTION_LOGOUT: &str = "logout";
pub(crate) const ACTION_INFO_DNS_RECORDS: &str = "infoDnsRecords";
pub(crate) const ACTION_UPDATE_DNS_RECORDS: &str = "updateDnsRecords";

/// Request envelope
#[derive(Debug, Serialize)]
pub(crate) struct ApiRequest<'a, P> {
    pub action: &'a str,
    pub param: P,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginParam<'a> {
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apipassword: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutParam<'a> {
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct InfoDnsRecordsParam<'a> {
    pub domainname: &'a str,
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateDnsRecordsParam<'a> {
    pub domainname: &'a str,
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
    pub dnsrecordset: DnsRecordSet<'a>,
}

/// Always exactly one record per submission
#[derive(Debug, Serialize)]
pub(crate) struct DnsRecordSet<'a> {
    pub dnsrecords: [&'a RecordPayload; 1],
}

/// Response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub statuscode: Option<i64>,
    #[serde(default)]
    pub longmessage: Option<String>,
    #[serde(default)]
    pub responsedata: serde_json::Value,
}

impl ApiResponse {
    /// Whether the provider flagged the action as failed
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Decode `responsedata` into an action-specific type
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.responsedata)
    }

    /// Whether `responsedata` contains the given key
    pub fn has_data_field(&self, key: &str) -> bool {
        self.responsedata.get(key).is_some()
    }

    /// Provider message with the status code, for error reporting
    pub fn describe(&self) -> String {
        match (&self.longmessage, self.statuscode) {
            (Some(msg), Some(code)) => format!("{} (status code {})", msg, code),
            (Some(msg), None) => msg.clone(),
            (None, Some(code)) => format!("status code {}", code),
            (None, None) => "no message from provider".to_string(),
        }
    }
}

/// `responsedata` of a login
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub apisessionid: String,
}

/// `responsedata` of infoDnsRecords
#[derive(Debug, Deserialize)]
pub(crate) struct DnsRecordsData {
    pub dnsrecords: Vec<DnsRecord>,
}
