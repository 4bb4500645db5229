// Typed errors for sampling, disk usage and telemetry delivery

/// A counter query failed or returned data that cannot form a snapshot. Abandons the tick.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("{counter} counters unavailable: {message}")]
    Unavailable {
        counter: &'static str,
        message: String,
    },

    #[error("inconsistent {counter} counters: {detail}")]
    Inconsistent {
        counter: &'static str,
        detail: String,
    },
}

impl SampleError {
    pub fn unavailable(counter: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            counter,
            message: message.into(),
        }
    }

    pub fn inconsistent(counter: &'static str, detail: impl Into<String>) -> Self {
        Self::Inconsistent {
            counter,
            detail: detail.into(),
        }
    }
}

/// One watched mount point could not be read. Only that entry is dropped from the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("path {path} is not accessible: {source}")]
    Inaccessible {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no mounted filesystem contains {0}")]
    NoFilesystem(String),
}

/// Telemetry flush failed. Logged by the sink, never retried.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telemetry endpoint rejected batch: status={status}, body={body}")]
    Status { status: u16, body: String },

    #[error("telemetry transport: {0}")]
    Transport(String),
}
