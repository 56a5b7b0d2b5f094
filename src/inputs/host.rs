use crate::products::unexpected::InvalidHost;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
/// Host priority, used for report and notification tagging
pub enum Priority {
    /// High priority host
    High,

    /// Medium priority host
    Medium,

    /// Low priority host
    Low,

    /// Priority not defined
    #[default]
    Unset,
}


impl From<Option<String>> for Priority {
    fn from(value: Option<String>) -> Priority {
        match value.as_deref().map(str::trim).map(str::to_lowercase) {
            Some(level) if level == "high" => Priority::High,
            Some(level) if level == "medium" => Priority::Medium,
            Some(level) if level == "low" => Priority::Low,
            Some(level) if level.is_empty() || level == "null" => Priority::Unset,
            Some(unknown) => {
                warn!("Unknown priority: '{}', treated as unset", unknown);
                Priority::Unset
            }
            None => Priority::Unset,
        }
    }
}


impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
            Priority::Unset => write!(f, "UNSET"),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Host to check the certificate of
pub struct HostEntry {
    /// Host name, also used as TLS server name
    #[serde(default)]
    pub hostname: String,

    /// Free text description
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub description: Option<String>,

    /// Host category, like "web" or "api"
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub category: Option<String>,

    /// Host priority
    #[serde(default)]
    pub priority: Priority,

    /// Environment, like "production"
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub environment: Option<String>,
}


/// Host entry read from configuration, possibly malformed
pub type HostRecord = Result<HostEntry, InvalidHost>;


impl HostEntry {
    /// New entry without metadata
    pub fn new(hostname: &str) -> HostEntry {
        HostEntry {
            hostname: hostname.to_string(),
            ..HostEntry::default()
        }
    }


    /// Parse a single entry of configuration "hosts" list
    pub fn from_value(position: usize, value: serde_json::Value) -> HostRecord {
        serde_json::from_value(value)
            .map_err(|err| InvalidHost::MalformedEntry(position, err.to_string()))
    }


    /// Hostname ready for connection, or why it can't be used
    pub fn validated_hostname(&self, position: usize) -> Result<&str, InvalidHost> {
        let hostname = self.hostname.trim();
        if hostname.is_empty() {
            return Err(InvalidHost::EmptyHostname(position));
        }
        if hostname
            .chars()
            .any(|character| character.is_whitespace() || "/:@?#".contains(character))
        {
            return Err(InvalidHost::MalformedHostname(
                position,
                hostname.to_string(),
            ));
        }
        Ok(hostname)
    }
}


/// GlobalSettings shared by all host checks of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GlobalSettings {
    /// Webhook to notify about at-risk hosts
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub webhook_url: Option<String>,

    /// Owner label put in notifications
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub owner: Option<String>,
}


impl GlobalSettings {
    /// Override settings with the defined ones (command line wins over file).
    /// Blank values clear the setting.
    pub fn override_with(&mut self, webhook_url: Option<&str>, owner: Option<&str>) {
        if let Some(webhook_url) = webhook_url {
            self.webhook_url = present(webhook_url);
        }
        if let Some(owner) = owner {
            self.owner = present(owner);
        }
    }
}


/// Trimmed text, None when blank or "null"
fn present(text: &str) -> Option<String> {
    Some(text.trim().to_string()).filter(|text| !text.is_empty() && text != "null")
}


/// Blank strings and "null" literals are absent values
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(present))
}
