use crate::{
    configuration::DEFAULT_OWNER,
    inputs::host::Priority,
    products::{certificate_result::CertificateResult, expected::ExpiryState},
};
use chrono::{DateTime, Utc};
use serde::Serialize;


#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// At-risk host entry of a notification
pub struct BatchEntry {
    /// Host name
    pub hostname: String,

    /// Expiring soon or expired
    pub state: ExpiryState,

    /// Whole days until expiry, negative once expired
    pub days_remaining: i64,

    /// Human readable expiration
    pub expires: String,

    /// Host priority
    pub priority: Priority,

    /// Host environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}


impl BatchEntry {
    /// Entry for classified at-risk result, None for anything else
    pub fn from_result(result: &CertificateResult) -> Option<BatchEntry> {
        let classification = result.classification?;
        if !classification.state.is_at_risk() {
            return None;
        }
        Some(BatchEntry {
            hostname: result.hostname.clone(),
            state: classification.state,
            days_remaining: classification.days_remaining,
            expires: result.expires.clone().unwrap_or_default(),
            priority: result.priority(),
            environment: result.environment().map(str::to_string),
        })
    }


    /// Markdown bullet line describing the entry
    pub fn to_bullet(&self) -> String {
        let status = match (self.state, self.days_remaining) {
            (ExpiryState::Expired, 0) => "expires today".to_string(),
            (ExpiryState::Expired, days) => format!("expired {} days ago", -days),
            (_, 1) => "expires in 1 day".to_string(),
            (_, days) => format!("expires in {} days", days),
        };
        let mut tags = vec![];
        if self.priority != Priority::Unset {
            tags.push(format!("Priority: {}", self.priority));
        }
        if let Some(environment) = &self.environment {
            tags.push(format!("Env: {}", environment));
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" ({})", tags.join(", "))
        };
        format!(
            "• **{}**: {} on {}{}",
            self.hostname, status, self.expires, tags
        )
    }
}


#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// At-risk hosts collected during a run, consumed by the notifier
pub struct NotificationBatch {
    /// Run timestamp
    pub generated_at: DateTime<Utc>,

    /// Owner label
    pub owner: String,

    /// At-risk hosts in host-list order
    pub entries: Vec<BatchEntry>,
}


impl NotificationBatch {
    /// New empty batch, blank owner falls back to the default one
    pub fn new(generated_at: DateTime<Utc>, owner: Option<&str>) -> NotificationBatch {
        NotificationBatch {
            generated_at,
            owner: owner
                .map(str::trim)
                .filter(|owner| !owner.is_empty())
                .unwrap_or(DEFAULT_OWNER)
                .to_string(),
            entries: vec![],
        }
    }


    /// Record a host result, only at-risk ones are kept
    pub fn push(&mut self, result: &CertificateResult) {
        if let Some(entry) = BatchEntry::from_result(result) {
            self.entries.push(entry);
        }
    }


    /// No at-risk hosts
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }


    /// Amount of at-risk hosts
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }


    /// Names of at-risk hosts in order
    pub fn hostnames(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.hostname.as_str())
            .collect()
    }
}
