use crate::{
    inputs::host::{HostEntry, Priority},
    products::{
        expected::{Classification, ExpiryState},
        unexpected::HostError,
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;


/// Alias Type for Vec<CertificateResult>
pub type CertificateResults = Vec<CertificateResult>;


#[derive(Debug, Clone, Serialize, PartialEq)]
/// Outcome of a single host check
pub struct CertificateResult {
    /// Checked host name
    pub hostname: String,

    /// Host metadata, absent for malformed entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<HostEntry>,

    /// Certificate "not valid after" instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,

    /// Human readable expiration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,

    /// Expiry classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,

    /// Why the host couldn't be classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<HostError>,
}


impl CertificateResult {
    /// New classified result
    pub fn classified(
        entry: &HostEntry,
        expiration: DateTime<Utc>,
        classification: Classification,
    ) -> CertificateResult {
        CertificateResult {
            hostname: entry.hostname.trim().to_string(),
            entry: Some(entry.clone()),
            expiration: Some(expiration),
            expires: Some(format_expiration(&expiration)),
            classification: Some(classification),
            error: None,
        }
    }


    /// New failed result
    pub fn failed(hostname: &str, entry: Option<&HostEntry>, error: HostError) -> CertificateResult {
        CertificateResult {
            hostname: hostname.to_string(),
            entry: entry.cloned(),
            expiration: None,
            expires: None,
            classification: None,
            error: Some(error),
        }
    }


    /// Expiry state, if classified
    pub fn state(&self) -> Option<ExpiryState> {
        self.classification.map(|classification| classification.state)
    }


    /// Classified as expiring soon or expired
    pub fn is_at_risk(&self) -> bool {
        self.state().map_or(false, ExpiryState::is_at_risk)
    }


    /// Host priority, unset for malformed entries
    pub fn priority(&self) -> Priority {
        self.entry
            .as_ref()
            .map(|entry| entry.priority)
            .unwrap_or_default()
    }


    /// Host environment, if defined
    pub fn environment(&self) -> Option<&str> {
        self.entry
            .as_ref()
            .and_then(|entry| entry.environment.as_deref())
    }
}


/// Render certificate expiration for humans
pub fn format_expiration(expiration: &DateTime<Utc>) -> String {
    expiration.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
