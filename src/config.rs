// Tue Jan 13 2026 - Alex

use crate::filter::RegexMarkerMatcher;
use crate::sizer::SizerKind;
use crate::walker::{FlyweightCatalogConfig, VisitLimit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_MAX_VISITED: &str = "SIZEOF_MAX_VISITED";
pub const ENV_ABORT: &str = "SIZEOF_ABORT";
pub const ENV_MARKER_PATTERN: &str = "SIZEOF_MARKER_PATTERN";
pub const ENV_DISABLE_AGENT: &str = "SIZEOF_DISABLE_AGENT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeOfConfig {
    pub max_visited_objects: u64,
    pub abort_on_limit: bool,
    pub bypass_flyweights: bool,
    pub cache_structural: bool,
    pub silent: bool,
    pub verbose_tracing: bool,
    pub sizers: Vec<SizerKind>,
    pub register_declarative_filter: bool,
    pub marker_pattern: Option<String>,
    pub flyweights: FlyweightCatalogConfig,
}

impl Default for SizeOfConfig {
    fn default() -> Self {
        Self {
            max_visited_objects: 1000,
            abort_on_limit: false,
            bypass_flyweights: true,
            cache_structural: true,
            silent: false,
            verbose_tracing: false,
            sizers: SizerKind::DEFAULT_ORDER.to_vec(),
            register_declarative_filter: true,
            marker_pattern: None,
            flyweights: FlyweightCatalogConfig::default(),
        }
    }
}

impl SizeOfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, max_visited_objects: u64, abort_on_limit: bool) -> Self {
        self.max_visited_objects = max_visited_objects;
        self.abort_on_limit = abort_on_limit;
        self
    }

    pub fn with_bypass_flyweights(mut self, bypass: bool) -> Self {
        self.bypass_flyweights = bypass;
        self
    }

    pub fn with_cache_structural(mut self, cache: bool) -> Self {
        self.cache_structural = cache;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_verbose_tracing(mut self, verbose: bool) -> Self {
        self.verbose_tracing = verbose;
        self
    }

    pub fn with_sizers(mut self, sizers: Vec<SizerKind>) -> Self {
        self.sizers = sizers;
        self
    }

    pub fn with_marker_pattern(mut self, pattern: &str) -> Self {
        self.marker_pattern = Some(pattern.to_string());
        self
    }

    pub fn with_flyweights(mut self, flyweights: FlyweightCatalogConfig) -> Self {
        self.flyweights = flyweights;
        self
    }

    pub fn visit_limit(&self) -> VisitLimit {
        VisitLimit::new(self.max_visited_objects, self.abort_on_limit)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_visited_objects == 0 {
            return Err(ConfigError::Validation("max_visited_objects must be > 0".to_string()));
        }
        if self.sizers.is_empty() {
            return Err(ConfigError::Validation("at least one sizing strategy is required".to_string()));
        }
        if let Some(pattern) = &self.marker_pattern {
            RegexMarkerMatcher::new(pattern).map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        self.flyweights.validate().map_err(ConfigError::Validation)?;
        Ok(())
    }

    /// Applies `SIZEOF_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_VISITED) {
            self.max_visited_objects = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("{}={}", ENV_MAX_VISITED, value)))?;
        }
        if let Some(value) = lookup(ENV_ABORT) {
            self.abort_on_limit = parse_flag(ENV_ABORT, &value)?;
        }
        if let Some(value) = lookup(ENV_MARKER_PATTERN) {
            self.marker_pattern = Some(value);
        }
        if let Some(value) = lookup(ENV_DISABLE_AGENT) {
            if parse_flag(ENV_DISABLE_AGENT, &value)? {
                self.sizers.retain(|kind| *kind != SizerKind::Agent);
            }
        }
        Ok(self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Parse(format!("{}={}", name, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_validate() {
        let config = SizeOfConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.visit_limit(), VisitLimit::new(1000, false));
        assert_eq!(config.sizers, SizerKind::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_validation_errors() {
        assert!(SizeOfConfig::new().with_limit(0, true).validate().is_err());
        assert!(SizeOfConfig::new().with_sizers(Vec::new()).validate().is_err());
        assert!(SizeOfConfig::new().with_marker_pattern("(").validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MAX_VISITED, "25"),
            (ENV_ABORT, "yes"),
            (ENV_DISABLE_AGENT, "true"),
            (ENV_MARKER_PATTERN, "^Skip$"),
        ]
        .into_iter()
        .collect();
        let config = SizeOfConfig::default()
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.visit_limit(), VisitLimit::new(25, true));
        assert_eq!(config.sizers, vec![SizerKind::Offset, SizerKind::Structural]);
        assert_eq!(config.marker_pattern.as_deref(), Some("^Skip$"));

        let bad = SizeOfConfig::default().apply_overrides(|name| (name == ENV_ABORT).then(|| "maybe".to_string()));
        assert!(matches!(bad, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sizeof.json");
        let config = SizeOfConfig::new()
            .with_limit(50_000, true)
            .with_sizers(vec![SizerKind::Structural])
            .with_flyweights(FlyweightCatalogConfig::default().with_small_values(-1, 1));
        config.save(&path).unwrap();
        assert_eq!(SizeOfConfig::load(&path).unwrap(), config);

        assert!(matches!(
            SizeOfConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"max_visited_objects": 10, "sizers": ["structural"]}"#).unwrap();
        let config = SizeOfConfig::load(&path).unwrap();
        assert_eq!(config.max_visited_objects, 10);
        assert!(config.bypass_flyweights);
        assert_eq!(config.sizers, vec![SizerKind::Structural]);
    }
}
