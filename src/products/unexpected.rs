use serde::Serialize;
use std::{io, path::PathBuf};
use thiserror::Error;


#[derive(Debug, Clone, Serialize, Error, PartialEq, Eq, Hash)]
/// Failure of a single certificate fetch
pub enum FetchError {
    /// Name resolution or TCP connection failed (host, details)
    #[error("Couldn't connect to host: {0}. Details: {1}")]
    DnsOrConnectFailure(String, String),

    /// TLS handshake failed (host, details)
    #[error("TLS handshake with host: {0} failed. Details: {1}")]
    TlsHandshakeFailure(String, String),

    /// Check didn't finish in given time (host, timeout in seconds)
    #[error("Host: {0} couldn't be checked in time frame of {1} seconds")]
    Timeout(String, u64),

    /// Leaf certificate missing or its expiry unreadable (host, details)
    #[error("Couldn't read certificate expiry of host: {0}. Details: {1}")]
    CertificateParseFailure(String, String),
}


impl FetchError {
    /// Operator hint printed below the failure
    pub fn hint(&self) -> &'static str {
        match self {
            FetchError::DnsOrConnectFailure(..) => {
                "possible causes: invalid hostname, network issue, firewall"
            }
            FetchError::TlsHandshakeFailure(..) => {
                "possible causes: service doesn't speak TLS on this port, unsupported protocol version"
            }
            FetchError::Timeout(..) => {
                "possible causes: host unreachable, firewall dropping packets, overloaded service"
            }
            FetchError::CertificateParseFailure(..) => {
                "possible causes: no certificate presented, malformed certificate"
            }
        }
    }
}


#[derive(Debug, Clone, Serialize, Error, PartialEq, Eq, Hash)]
/// Host entry that can't be checked because of its configuration
pub enum InvalidHost {
    /// Hostname missing or blank (entry position)
    #[error("Host entry #{0} has an empty hostname")]
    EmptyHostname(usize),

    /// Hostname contains characters no hostname can contain (entry position, hostname)
    #[error("Host entry #{0} has a malformed hostname: \"{1}\"")]
    MalformedHostname(usize, String),

    /// Entry isn't a valid host object (entry position, details)
    #[error("Host entry #{0} is malformed. Details: {1}")]
    MalformedEntry(usize, String),
}


#[derive(Debug, Clone, Serialize, Error, PartialEq, Eq, Hash)]
/// Error of a single host check, stored in its result
pub enum HostError {
    /// Certificate couldn't be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Host entry is invalid
    #[error(transparent)]
    Invalid(#[from] InvalidHost),
}


impl HostError {
    /// Operator hint printed below the failure
    pub fn hint(&self) -> &'static str {
        match self {
            HostError::Fetch(fetch_error) => fetch_error.hint(),
            HostError::Invalid(_) => "fix the host entry in configuration file",
        }
    }
}


#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Webhook notification failure
pub enum NotifyError {
    /// Payload couldn't be built
    #[error("Failed to build notification payload. Details: {0}")]
    Payload(String),

    /// Webhook unreachable or responded with non-2xx code
    #[error("Failed to deliver notification to webhook: {0}. Details: {1}")]
    DeliveryFailed(String, String),
}


#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Run-level input error, stops the run before any host is checked
pub enum RunError {
    /// No hosts to check
    #[error("No hosts defined! Nothing to check.")]
    EmptyHostList,

    /// Port out of 1-65535 range
    #[error("Invalid port: {0}. Expected value in range 1-65535")]
    InvalidPort(u32),

    /// Timeout lower than a second
    #[error("Invalid timeout: {0}s. Expected at least 1 second")]
    InvalidTimeout(u64),

    /// Concurrency out of range (given, maximum)
    #[error("Invalid concurrency: {0}. Expected value in range 1-{1}")]
    InvalidConcurrency(usize, usize),

    /// Worker pool couldn't be started
    #[error("Failed to start check workers. Details: {0}")]
    WorkerPool(String),
}


#[derive(Debug, Error)]
/// Configuration file error, fatal for the whole run
pub enum ConfigError {
    /// None of the default locations contains a config file
    #[error("No configuration file found in any of: {0}")]
    NotFound(String),

    /// Config file can't be read
    #[error("Failed to read configuration file: {}. Details: {}", .0.display(), .1)]
    Read(PathBuf, #[source] io::Error),

    /// Config file isn't valid JSON of expected shape
    #[error("Configuration error in file: {}. Details: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),
}
