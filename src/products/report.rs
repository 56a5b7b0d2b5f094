use crate::{
    inputs::host::Priority,
    products::{
        certificate_result::{CertificateResult, CertificateResults},
        expected::ExpiryState,
    },
    utilities::plural,
};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt;


#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Default)]
/// Result counts of a run
pub struct Summary {
    /// Hosts processed
    pub processed: usize,

    /// Hosts with valid certificates
    pub valid: usize,

    /// Hosts with certificates expiring soon
    pub expiring_soon: usize,

    /// Hosts with expired certificates
    pub expired: usize,

    /// Hosts that couldn't be checked
    pub failed: usize,
}


impl Summary {
    /// Count results
    pub fn of(results: &[CertificateResult]) -> Summary {
        results.iter().fold(
            Summary {
                processed: results.len(),
                ..Summary::default()
            },
            |mut summary, result| {
                match result.state() {
                    Some(ExpiryState::Valid) => summary.valid += 1,
                    Some(ExpiryState::ExpiringSoon) => summary.expiring_soon += 1,
                    Some(ExpiryState::Expired) => summary.expired += 1,
                    None => summary.failed += 1,
                }
                summary
            },
        )
    }


    /// Hosts expiring soon or expired
    pub fn at_risk(&self) -> usize {
        self.expiring_soon + self.expired
    }
}


impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}: {} valid, {} expiring soon, {} expired, {} failed",
            plural(self.processed, "host"),
            self.valid,
            self.expiring_soon,
            self.expired,
            self.failed
        )
    }
}


#[derive(Debug, Clone, Serialize, PartialEq)]
/// Per-host results of a run, in host-list order
pub struct Report {
    /// Run timestamp
    pub generated_at: DateTime<Utc>,

    /// Host results
    pub results: CertificateResults,

    /// Result counts
    pub summary: Summary,
}


impl Report {
    /// New report of given results
    pub fn new(generated_at: DateTime<Utc>, results: CertificateResults) -> Report {
        let summary = Summary::of(&results);
        Report {
            generated_at,
            results,
            summary,
        }
    }


    /// Any host expiring soon or expired
    pub fn any_at_risk(&self) -> bool {
        self.summary.at_risk() > 0
    }


    /// Any host that couldn't be checked
    pub fn any_failed(&self) -> bool {
        self.summary.failed > 0
    }


    /// JSON rendering of the report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }
}


impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            format!(
                "TLS certificate report, generated: {}",
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .bold()
        )?;
        for result in &self.results {
            writeln!(f, "{}", render_result(result))?;
        }
        let summary = self.summary.to_string();
        let summary = if self.any_failed() || self.summary.expired > 0 {
            summary.red().bold()
        } else if self.any_at_risk() {
            summary.yellow().bold()
        } else {
            summary.green().bold()
        };
        write!(f, "{}", summary)
    }
}


/// Single result line, with metadata and failure hint lines
fn render_result(result: &CertificateResult) -> String {
    let status = match (&result.classification, &result.error) {
        (Some(classification), _) => {
            let expires = result.expires.clone().unwrap_or_default();
            match classification.state {
                ExpiryState::Valid => {
                    format!(
                        "{} {} - valid until {} ({} days remaining)",
                        "✓".green(),
                        result.hostname.bold(),
                        expires,
                        classification.days_remaining
                    )
                }
                ExpiryState::ExpiringSoon => {
                    format!(
                        "{} {} - {} {} ({})",
                        "⚠".yellow(),
                        result.hostname.bold(),
                        "EXPIRING SOON:".yellow().bold(),
                        expires,
                        classification.describe()
                    )
                }
                ExpiryState::Expired => {
                    format!(
                        "{} {} - {} {} ({})",
                        "✗".red(),
                        result.hostname.bold(),
                        "EXPIRED:".red().bold(),
                        expires,
                        classification.describe()
                    )
                }
            }
        }
        (None, Some(error)) => {
            format!(
                "{} {} - {}\n    {}",
                "✗".red(),
                result.hostname.bold(),
                error.to_string().red(),
                error.hint().dimmed()
            )
        }
        (None, None) => format!("? {} - not checked", result.hostname.bold()),
    };

    match render_metadata(result) {
        Some(metadata) => format!("{}\n    {}", status, metadata),
        None => status,
    }
}


/// Priority, environment, category and description of a result, if any defined
fn render_metadata(result: &CertificateResult) -> Option<String> {
    let entry = result.entry.as_ref()?;
    let mut parts = vec![];
    match entry.priority {
        Priority::High => parts.push(format!("[{}]", entry.priority).red().bold().to_string()),
        Priority::Medium => parts.push(format!("[{}]", entry.priority).yellow().to_string()),
        Priority::Low => parts.push(format!("[{}]", entry.priority).blue().to_string()),
        Priority::Unset => (),
    }
    if let Some(environment) = &entry.environment {
        parts.push(format!("[{}]", environment).cyan().to_string());
    }
    if let Some(category) = &entry.category {
        parts.push(format!("({})", category));
    }
    if let Some(description) = &entry.description {
        parts.push(description.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
