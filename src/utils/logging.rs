// Tue Jan 13 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

pub const ENV_LOG: &str = "RUST_LOG";

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the colored stderr logger. A logger installed earlier wins.
    pub fn init_logger(level: LevelFilter, color: bool) {
        let logger = Box::new(ColoredLogger::new(level, color));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    /// `RUST_LOG` takes over when set; otherwise the colored logger at `fallback`.
    pub fn init_from_env(fallback: LevelFilter, color: bool) {
        if std::env::var_os(ENV_LOG).is_some() {
            let _ = env_logger::Builder::from_default_env().try_init();
        } else {
            Self::init_logger(fallback, color);
        }
    }

    pub fn level_from_str(s: &str) -> Option<LevelFilter> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LevelFilter::Error),
            "warn" | "warning" => Some(LevelFilter::Warn),
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            "off" => Some(LevelFilter::Off),
            _ => None,
        }
    }

    pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    color: bool,
}

impl ColoredLogger {
    fn new(level: LevelFilter, color: bool) -> Self {
        Self { level, color }
    }

    fn format_level(&self, level: Level) -> String {
        if !self.color {
            return format!("{:5}", level);
        }
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
        .to_string()
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // heap_sizeof::walker::walker -> walker
        let target = record.target().rsplit("::").nth(1).unwrap_or(record.target());
        let target = format!("[{}]", target);
        let target = if self.color { target.dimmed().to_string() } else { target };
        eprintln!("{} {} {}", self.format_level(record.level()), target, record.args());
    }

    fn flush(&self) {}
}

/// Logs the time spent in a scope at debug level when dropped.
pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("{} took {:.2}ms", self.name, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("Warning"), Some(LevelFilter::Warn));
        assert_eq!(LoggingUtils::level_from_str(" debug "), Some(LevelFilter::Debug));
        assert_eq!(LoggingUtils::level_from_str("loud"), None);
    }

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(LoggingUtils::level_from_verbosity(0), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_verbosity(2), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_plain_level_padding() {
        let logger = ColoredLogger::new(LevelFilter::Info, false);
        assert_eq!(logger.format_level(Level::Warn), "WARN ");
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }
}
