// Wed Jan 15 2026 - Alex

use crate::config::SizeOfConfig;
use crate::engine::{SizeOfEngine, SizeOfError};
use crate::filter::FilterSource;
use crate::heap::HostFacilities;
use crate::model::{self, RuntimeMemoryModel};
use std::sync::Arc;

/// Builds engines that share one [`FilterSource`].
///
/// Exclusions registered on the source are picked up by engines created
/// afterwards, and by existing engines for types they have not cached yet.
pub struct EngineFactory {
    source: Arc<FilterSource>,
    model: RuntimeMemoryModel,
    facilities: HostFacilities,
    config: SizeOfConfig,
}

impl EngineFactory {
    pub fn new(model: RuntimeMemoryModel, facilities: HostFacilities, config: SizeOfConfig) -> Result<Self, SizeOfError> {
        config.validate()?;
        let source = match &config.marker_pattern {
            Some(pattern) if config.register_declarative_filter => FilterSource::with_marker_pattern(pattern)?,
            _ => FilterSource::new(config.register_declarative_filter),
        };
        Ok(Self {
            source: Arc::new(source),
            model,
            facilities,
            config,
        })
    }

    /// Factory for the memory model detected from the environment.
    pub fn detected(facilities: HostFacilities, config: SizeOfConfig) -> Result<Self, SizeOfError> {
        Self::new(model::detect_from_env(), facilities, config)
    }

    pub fn filter_source(&self) -> &Arc<FilterSource> {
        &self.source
    }

    pub fn model(&self) -> &RuntimeMemoryModel {
        &self.model
    }

    pub fn config(&self) -> &SizeOfConfig {
        &self.config
    }

    /// Engine using the factory's configuration as is.
    pub fn create_default(&self) -> Result<SizeOfEngine, SizeOfError> {
        self.build(&self.config)
    }

    pub fn create_engine(
        &self,
        max_visited_objects: u64,
        abort_on_limit: bool,
        silent: bool,
    ) -> Result<SizeOfEngine, SizeOfError> {
        let config = self
            .config
            .clone()
            .with_limit(max_visited_objects, abort_on_limit)
            .with_silent(silent);
        self.build(&config)
    }

    fn build(&self, config: &SizeOfConfig) -> Result<SizeOfEngine, SizeOfError> {
        SizeOfEngine::new(self.model, &self.facilities, Arc::new(self.source.combined()), config)
    }
}
