use crate::{
    configuration::{NOTIFICATION_TITLE, WEBHOOK_CONNECTION_TIMEOUT, WEBHOOK_TIMEOUT},
    products::{notification_batch::NotificationBatch, unexpected::NotifyError},
    utilities::plural,
    Collector,
};
use curl::easy::{Easy2, List};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};


#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Notification result that isn't a failure
pub enum NotifyStatus {
    /// Webhook accepted the notification
    Sent,

    /// Nothing to send, or no webhook configured
    Skipped,
}


/// Delivers notification batches
pub trait Notifier: Send + Sync {
    /// Notify about at-risk hosts of the batch. Absent webhook or empty batch is Skipped.
    fn notify(
        &self,
        webhook_url: Option<&str>,
        batch: &NotificationBatch,
    ) -> Result<NotifyStatus, NotifyError>;
}


/// Posts MessageCard JSON payloads to an incoming webhook, single attempt
#[derive(Debug, Copy, Clone)]
pub struct WebhookNotifier {
    /// Whole request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connection_timeout: Duration,
}


impl Default for WebhookNotifier {
    fn default() -> WebhookNotifier {
        WebhookNotifier {
            timeout: Duration::from_secs(WEBHOOK_TIMEOUT),
            connection_timeout: Duration::from_secs(WEBHOOK_CONNECTION_TIMEOUT),
        }
    }
}


impl Notifier for WebhookNotifier {
    fn notify(
        &self,
        webhook_url: Option<&str>,
        batch: &NotificationBatch,
    ) -> Result<NotifyStatus, NotifyError> {
        let webhook = match webhook_url.map(str::trim) {
            Some(webhook) if !webhook.is_empty() => webhook,
            _ => {
                info!("Notifications not configured hence skipped…");
                return Ok(NotifyStatus::Skipped);
            }
        };
        if batch.is_empty() {
            debug!("No at-risk hosts, notification skipped");
            return Ok(NotifyStatus::Skipped);
        }

        let payload = serde_json::to_string(&message_card(batch))
            .map_err(|err| NotifyError::Payload(err.to_string()))?;
        info!(
            "Sending notification about {} to webhook",
            plural(batch.total_count(), "at-risk host")
        );
        match self.post(webhook, &payload) {
            Ok((code, _)) if (200..300).contains(&code) => {
                info!("Notification delivered, webhook responded: {}", code);
                Ok(NotifyStatus::Sent)
            }
            Ok((code, body)) => {
                let failure = NotifyError::DeliveryFailed(
                    webhook.to_string(),
                    format!("webhook responded: {}, body: {}", code, body),
                );
                warn!("{}", failure);
                Err(failure)
            }
            Err(err) => {
                let failure = NotifyError::DeliveryFailed(webhook.to_string(), err.to_string());
                warn!("{}", failure);
                Err(failure)
            }
        }
    }
}


impl WebhookNotifier {
    /// POST JSON payload, return response code and (shortened) body
    fn post(&self, webhook: &str, payload: &str) -> Result<(u32, String), curl::Error> {
        let mut curl = Easy2::new(Collector(Vec::new()));
        curl.url(webhook)?;
        curl.post(true)?;
        curl.post_fields_copy(payload.as_bytes())?;

        let mut headers = List::new();
        headers.append("Content-Type: application/json")?;
        headers.append("Expect:")?; // no 100-continue round trip
        curl.http_headers(headers)?;

        curl.follow_location(false)?;
        curl.connect_timeout(self.connection_timeout)?;
        curl.timeout(self.timeout)?;
        curl.perform()?;

        let code = curl.response_code()?;
        let body = String::from_utf8_lossy(&curl.get_ref().0)
            .chars()
            .take(200)
            .collect();
        Ok((code, body))
    }
}


/// MessageCard payload: title, facts of the run, bullet list of at-risk hosts
pub fn message_card(batch: &NotificationBatch) -> Value {
    let generated_at = batch
        .generated_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    let hosts = batch
        .entries
        .iter()
        .map(|entry| entry.to_bullet())
        .collect::<Vec<_>>()
        .join("\n\n");
    let summary = format!(
        "{}: {} need attention",
        NOTIFICATION_TITLE,
        plural(batch.total_count(), "certificate")
    );

    json!({
        "@type": "MessageCard",
        "@context": "https://schema.org/extensions",
        "summary": summary,
        "themeColor": "FF0000",
        "title": NOTIFICATION_TITLE,
        "sections": [
            {
                "activityTitle": "Certificates expiring soon or expired",
                "facts": [
                    { "name": "Alert Time", "value": generated_at },
                    { "name": "Owner", "value": batch.owner },
                    { "name": "Total Certificates", "value": batch.total_count().to_string() }
                ],
                "text": hosts,
                "markdown": true
            }
        ]
    })
}
