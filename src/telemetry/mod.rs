// Telemetry client: buffers metric points and delivers them in one flush.

mod envelope;
mod http;

use crate::error::TelemetryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub use envelope::{DataPoint, Envelope, EnvelopeData, MetricData};
pub use http::{DEFAULT_ENDPOINT, HttpTransport};

/// Delivers one flushed batch of envelopes.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    async fn send(&self, batch: &[Envelope]) -> Result<(), TelemetryError>;
}

/// Identity stamped on every envelope.
#[derive(Debug, Clone)]
pub struct TelemetryContext {
    pub instrumentation_key: String,
    /// Pool id, reported as the cloud role.
    pub role: String,
    /// Node id, reported as the cloud role instance.
    pub role_instance: String,
    pub application_id: String,
    pub application_version: String,
    pub device_model: String,
}

impl TelemetryContext {
    pub fn new(instrumentation_key: &str, pool_id: &str, node_id: &str) -> Self {
        Self {
            instrumentation_key: instrumentation_key.to_string(),
            role: pool_id.to_string(),
            role_instance: node_id.to_string(),
            application_id: crate::version::APPLICATION_ID.to_string(),
            application_version: crate::version::VERSION.to_string(),
            device_model: crate::version::DEVICE_MODEL.to_string(),
        }
    }

    fn tags(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("ai.application.id", self.application_id.clone()),
            ("ai.application.ver", self.application_version.clone()),
            ("ai.cloud.role", self.role.clone()),
            ("ai.cloud.roleInstance", self.role_instance.clone()),
            ("ai.device.model", self.device_model.clone()),
        ])
    }
}

pub struct TelemetryClient {
    context: TelemetryContext,
    transport: Box<dyn TelemetryTransport>,
    buffer: Vec<Envelope>,
}

impl TelemetryClient {
    pub fn new(context: TelemetryContext, transport: Box<dyn TelemetryTransport>) -> Self {
        Self {
            context,
            transport,
            buffer: Vec::new(),
        }
    }

    pub fn context(&self) -> &TelemetryContext {
        &self.context
    }

    /// Number of points waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn track_metric(&mut self, name: &str, value: f64, properties: &[(&str, String)]) {
        self.track_metric_at(name, value, properties, Utc::now());
    }

    pub fn track_metric_at(
        &mut self,
        name: &str,
        value: f64,
        properties: &[(&str, String)],
        time: DateTime<Utc>,
    ) {
        let properties = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.buffer.push(Envelope::metric(
            &self.context.instrumentation_key,
            self.context.tags(),
            name,
            value,
            properties,
            time,
        ));
    }

    /// Hands every pending point to the transport in a single call. The buffer is cleared even
    /// when delivery fails; points are not kept for a retry.
    pub async fn flush(&mut self) -> Result<usize, TelemetryError> {
        let batch = std::mem::take(&mut self.buffer);
        if batch.is_empty() {
            return Ok(0);
        }
        self.transport.send(&batch).await?;
        Ok(batch.len())
    }
}
