use crate::{
    checks::{batch::BatchRunner, fetcher::CertificateFetcher},
    config::RunParameters,
    inputs::host::{GlobalSettings, HostRecord},
    notificator::{Notifier, NotifyStatus},
    products::{
        notification_batch::NotificationBatch,
        report::Report,
        unexpected::{NotifyError, RunError},
    },
};
use serde::Serialize;
use tracing::{error, info};


/**
    Public library API for certificate expiry runs
 **/


#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Outcome of a completed run
pub enum RunOutcome {
    /// Every certificate is valid
    Healthy,

    /// Some certificates expire soon, expired, or couldn't be checked
    AtRisk,
}


#[derive(Debug, Clone)]
/// Everything a single run produced
pub struct Execution {
    /// Per-host report
    pub report: Report,

    /// At-risk hosts
    pub batch: NotificationBatch,

    /// Notification result, failure doesn't change the outcome
    pub notification: Result<NotifyStatus, NotifyError>,
}


impl Execution {
    /// Run outcome
    pub fn outcome(&self) -> RunOutcome {
        if self.report.any_at_risk() || self.report.any_failed() {
            RunOutcome::AtRisk
        } else {
            RunOutcome::Healthy
        }
    }
}


/// Check all hosts, then notify about at-risk ones.
/// Only run-level input errors fail the whole run.
pub fn execute_checks<F, N>(
    fetcher: F,
    notifier: &N,
    records: &[HostRecord],
    settings: &GlobalSettings,
    params: &RunParameters,
) -> Result<Execution, RunError>
where
    F: CertificateFetcher,
    N: Notifier,
{
    let (report, batch) = BatchRunner::new(fetcher).run(records, settings, params)?;
    let notification = if batch.is_empty() {
        info!("All certificates are fine, nothing to notify about.");
        Ok(NotifyStatus::Skipped)
    } else {
        notifier.notify(settings.webhook_url.as_deref(), &batch)
    };
    if let Err(err) = &notification {
        error!("Notification failed: {}", err);
    }
    Ok(Execution {
        report,
        batch,
        notification,
    })
}
