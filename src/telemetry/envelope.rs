// Application Insights metric envelope (wire format)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const METRIC_ENVELOPE_NAME: &str = "Microsoft.ApplicationInsights.Metric";
const METRIC_BASE_TYPE: &str = "MetricData";
const METRIC_DATA_VERSION: u32 = 2;
// DataPointType.Measurement
const DATA_POINT_KIND_MEASUREMENT: u32 = 0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub name: &'static str,
    pub time: String,
    pub i_key: String,
    pub tags: BTreeMap<&'static str, String>,
    pub data: EnvelopeData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    pub base_type: &'static str,
    pub base_data: MetricData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricData {
    pub ver: u32,
    pub metrics: Vec<DataPoint>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub name: String,
    pub kind: u32,
    pub value: f64,
    pub count: u32,
}

impl Envelope {
    pub fn metric(
        instrumentation_key: &str,
        tags: BTreeMap<&'static str, String>,
        name: &str,
        value: f64,
        properties: BTreeMap<String, String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: METRIC_ENVELOPE_NAME,
            time: time.to_rfc3339_opts(SecondsFormat::Millis, true),
            i_key: instrumentation_key.to_string(),
            tags,
            data: EnvelopeData {
                base_type: METRIC_BASE_TYPE,
                base_data: MetricData {
                    ver: METRIC_DATA_VERSION,
                    metrics: vec![DataPoint {
                        name: name.to_string(),
                        kind: DATA_POINT_KIND_MEASUREMENT,
                        value,
                        count: 1,
                    }],
                    properties,
                },
            },
        }
    }

    /// Name of the single metric carried by this envelope.
    pub fn metric_name(&self) -> &str {
        self.data
            .base_data
            .metrics
            .first()
            .map(|m| m.name.as_str())
            .unwrap_or_default()
    }

    pub fn metric_value(&self) -> Option<f64> {
        self.data.base_data.metrics.first().map(|m| m.value)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.data.base_data.properties.get(key).map(String::as_str)
    }
}
