//! Formatting utility functions.
//!
//! Provides the label text shown next to plotted samples and human-readable
//! sizes for log output.

use crate::analysis::PeriodSample;

/// Format byte count as human-readable string.
///
/// # Examples
/// ```
/// use kullback::util::format::format_bytes;
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Two-line hover label for a sample: key length and IoC.
pub fn sample_label(sample: &PeriodSample) -> String {
    format!("length = {}\nioc = {:.4}", sample.period, sample.ioc)
}

/// Always-on label for a flagged sample.
pub fn peak_label(sample: &PeriodSample) -> String {
    sample.period.to_string()
}
