use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Serialize)]
struct SyncRequest {
    #[serde(rename = "leadIds")]
    lead_ids: Vec<String>,
}

/// What the outreach endpoint reports back for a bulk push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    #[serde(rename = "syncedCount")]
    pub synced_count: i64,
    #[serde(rename = "totalEmails")]
    pub total_emails: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SyncErrorBody {
    error: String,
}

/// Thin client for the "Sync Instantly" endpoint. No retries, no partial
/// completion bookkeeping beyond what the endpoint reports.
pub struct SyncClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SyncClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.sync.request_timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.sync.endpoint.clone(),
        })
    }

    pub async fn sync(&self, lead_ids: Vec<String>) -> Result<SyncSummary> {
        debug!("POST {} with {} lead ids", self.endpoint, lead_ids.len());

        let response = self
            .http
            .post(&self.endpoint)
            .json(&SyncRequest { lead_ids })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<SyncErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("sync endpoint returned {status}"),
            };
            return Err(message.into());
        }

        let summary = response.json::<SyncSummary>().await?;
        info!(
            "✓ Sync complete: {}/{} emails synced",
            summary.synced_count, summary.total_emails
        );
        Ok(summary)
    }
}
