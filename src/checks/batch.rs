use crate::{
    checks::{expiry::classify, fetcher::CertificateFetcher},
    config::RunParameters,
    inputs::host::{GlobalSettings, HostRecord},
    products::{
        certificate_result::{CertificateResult, CertificateResults},
        notification_batch::NotificationBatch,
        report::Report,
        unexpected::{HostError, RunError},
    },
};
use chrono::{DateTime, Utc};
use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::{debug, error, info, warn};


/// Drives certificate checks of all configured hosts
#[derive(Debug, Clone)]
pub struct BatchRunner<F: CertificateFetcher> {
    fetcher: F,
}


impl<F: CertificateFetcher> BatchRunner<F> {
    /// New runner using given certificate source
    pub fn new(fetcher: F) -> BatchRunner<F> {
        BatchRunner { fetcher }
    }


    /// Check all hosts now, produce report and batch of at-risk hosts
    pub fn run(
        &self,
        records: &[HostRecord],
        settings: &GlobalSettings,
        params: &RunParameters,
    ) -> Result<(Report, NotificationBatch), RunError> {
        self.run_at(records, settings, params, Utc::now())
    }


    /// Check all hosts, classifying expirations relative to given moment.
    ///
    /// Hosts are checked on a pool of `params.concurrency` workers, results
    /// keep host-list order whatever the completion order is.
    pub fn run_at(
        &self,
        records: &[HostRecord],
        settings: &GlobalSettings,
        params: &RunParameters,
        now: DateTime<Utc>,
    ) -> Result<(Report, NotificationBatch), RunError> {
        if records.is_empty() {
            return Err(RunError::EmptyHostList);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(params.concurrency)
            .thread_name(|index| format!("certwatch-check-{}", index))
            .build()
            .map_err(|err| RunError::WorkerPool(err.to_string()))?;

        info!(
            "Checking {} hosts on port: {}, timeout: {}s, concurrency: {}",
            records.len(),
            params.port,
            params.timeout.as_secs(),
            params.concurrency
        );
        let results: CertificateResults = pool.install(|| {
            records
                .par_iter()
                .enumerate()
                .map(|(index, record)| self.check_host(index + 1, record, params, &now))
                .collect()
        });

        let mut batch = NotificationBatch::new(now, settings.owner.as_deref());
        for result in &results {
            batch.push(result);
        }
        let report = Report::new(now, results);
        info!("{}", report.summary);
        Ok((report, batch))
    }


    /// Check single host, never fails: every problem ends up in the result
    fn check_host(
        &self,
        position: usize,
        record: &HostRecord,
        params: &RunParameters,
        now: &DateTime<Utc>,
    ) -> CertificateResult {
        let entry = match record {
            Ok(entry) => entry,
            Err(invalid) => {
                warn!("{}", invalid);
                return CertificateResult::failed(
                    &format!("<entry #{}>", position),
                    None,
                    HostError::Invalid(invalid.clone()),
                );
            }
        };
        let hostname = match entry.validated_hostname(position) {
            Ok(hostname) => hostname,
            Err(invalid) => {
                warn!("{}", invalid);
                let label = if entry.hostname.trim().is_empty() {
                    format!("<entry #{}>", position)
                } else {
                    entry.hostname.trim().to_string()
                };
                return CertificateResult::failed(&label, Some(entry), HostError::Invalid(invalid));
            }
        };

        debug!("Checking certificate of: {}:{}", hostname, params.port);
        match self.fetcher.fetch(hostname, params.port, params.timeout) {
            Ok(expiration) => {
                let classification = classify(&expiration, now);
                debug!(
                    "Certificate of: {} expires: {}, days remaining: {}, state: {}",
                    hostname, expiration, classification.days_remaining, classification.state
                );
                CertificateResult::classified(entry, expiration, classification)
            }
            Err(fetch_error) => {
                error!("{}", fetch_error);
                CertificateResult::failed(hostname, Some(entry), HostError::Fetch(fetch_error))
            }
        }
    }
}
