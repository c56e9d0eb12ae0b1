// Tue Jan 13 2026 - Alex

pub mod logging;

pub use logging::{LoggingUtils, ScopedTimer};

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();

    if total_secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if total_secs < 1.0 {
        format!("{:.2}ms", total_secs * 1000.0)
    } else {
        format!("{:.2}s", total_secs)
    }
}

/// Exact byte count with a binary-unit hint for large values.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{} bytes ({:.2} GB)", b, b as f64 / GB as f64),
        b if b >= MB => format!("{} bytes ({:.2} MB)", b, b as f64 / MB as f64),
        b if b >= KB => format!("{} bytes ({:.2} KB)", b, b as f64 / KB as f64),
        b => format!("{} bytes", b),
    }
}

pub fn pluralize(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
