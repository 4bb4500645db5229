// Library for tests to access modules

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod platform;
pub mod sampler;
pub mod shutdown;
pub mod sink;
pub mod sysinfo_repo;
pub mod telemetry;
pub mod version;
pub mod worker;
