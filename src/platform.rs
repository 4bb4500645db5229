// Platform detection: default mount points to watch and host identity for the startup banner.

use std::path::Path;
use sysinfo::System;

const WINDOWS_DISKS: [&str; 2] = ["C:/", "D:/"];
const POSIX_OS_DISK: &str = "/";
const POSIX_USER_DISK: &str = "/mnt/resources";
const POSIX_USER_DISK_FALLBACK: &str = "/mnt";

/// Mount points watched for disk usage on this host.
pub fn default_disks() -> Vec<String> {
    default_disks_for(cfg!(windows), |p| Path::new(p).exists())
}

/// Windows watches `C:/` and `D:/`. Elsewhere the OS disk `/` plus `/mnt/resources` when it
/// exists, otherwise `/mnt`.
pub fn default_disks_for(windows: bool, exists: impl Fn(&str) -> bool) -> Vec<String> {
    if windows {
        return WINDOWS_DISKS.iter().map(|d| d.to_string()).collect();
    }
    let user_disk = if exists(POSIX_USER_DISK) {
        POSIX_USER_DISK
    } else {
        POSIX_USER_DISK_FALLBACK
    };
    vec![POSIX_OS_DISK.to_string(), user_disk.to_string()]
}

/// Host identity logged once at startup.
#[derive(Debug, Clone)]
pub struct SystemSummary {
    pub os: String,
    pub os_version: String,
    pub distribution: String,
    pub host_name: String,
    pub cpu_count: usize,
}

pub fn system_summary() -> SystemSummary {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    SystemSummary {
        os: System::name().unwrap_or_else(|| std::env::consts::OS.into()),
        os_version: System::os_version().unwrap_or_default(),
        distribution: read_os_pretty_name().unwrap_or_default(),
        host_name: System::host_name().unwrap_or_default(),
        cpu_count: sys.cpus().len(),
    }
}

/// Distribution name from /etc/os-release (Linux).
fn read_os_pretty_name() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        parse_os_release(&content)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// `PRETTY_NAME` if present, else `NAME`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_os_release(content: &str) -> Option<String> {
    let value = |key: &str| {
        content
            .lines()
            .find_map(|line| line.strip_prefix(key))
            .map(|v| v.trim().trim_matches('"').to_string())
            .filter(|v| !v.is_empty())
    };
    value("PRETTY_NAME=").or_else(|| value("NAME="))
}
