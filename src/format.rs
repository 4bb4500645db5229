// Human-readable number formatting for the log sink

const UNITS: [&str; 8] = ["", "K", "M", "G", "T", "P", "E", "Z"];

/// Scales `num` by powers of 1000 and prints one decimal, e.g. `1500` -> `1.5K`, `999` -> `999.0`.
pub fn pretty_nb(num: f64) -> String {
    pretty_nb_with_suffix(num, "")
}

/// Same as [`pretty_nb`] with a unit suffix appended after the scale letter (`1.5KB`).
pub fn pretty_nb_with_suffix(num: f64, suffix: &str) -> String {
    let mut num = num;
    for unit in UNITS {
        if num.abs() < 1000.0 {
            return format!("{num:3.1}{unit}{suffix}");
        }
        num /= 1000.0;
    }
    format!("{num:.1}Yi{suffix}")
}

/// Arithmetic mean; 0 for an empty slice.
pub fn avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Hides a secret for display: `-` when empty, `xxxxx` otherwise.
pub fn hide_secret(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "xxxxx",
        _ => "-",
    }
}
