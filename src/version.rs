// Build-time version from Cargo.toml

/// Package version (from Cargo.toml). Reported as the telemetry application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Application id attached to every telemetry envelope.
pub const APPLICATION_ID: &str = "AzureBatchInsights";

/// Device model tag attached to every telemetry envelope.
pub const DEVICE_MODEL: &str = "BatchNode";
