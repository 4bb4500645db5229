// HTTP transport for telemetry batches

use super::{Envelope, TelemetryTransport};
use crate::error::TelemetryError;
use async_trait::async_trait;
use std::time::Duration;

/// Application Insights ingestion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://dc.services.visualstudio.com/v2/track";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY: usize = 512;

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TelemetryTransport for HttpTransport {
    async fn send(&self, batch: &[Envelope]) -> Result<(), TelemetryError> {
        let resp = self
            .client
            .post(self.endpoint.as_str())
            .json(batch)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            tracing::debug!(
                operation = "telemetry_send",
                points = batch.len(),
                status = status.as_u16(),
                "telemetry batch accepted"
            );
            return Ok(());
        }
        let body = match resp.text().await {
            Ok(text) => text.chars().take(MAX_ERROR_BODY).collect(),
            Err(e) => format!("[failed to read response body: {e}]"),
        };
        Err(TelemetryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
