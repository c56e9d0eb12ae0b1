// Wed Jan 15 2026 - Alex

use crate::config::SizeOfConfig;
use crate::engine::{SizeOfError, Size};
use crate::filter::SizeOfFilter;
use crate::heap::{Heap, HostFacilities, ObjectId};
use crate::introspect::FieldAndClassCache;
use crate::model::RuntimeMemoryModel;
use crate::sizer::{CachingSizer, FallbackSizer, ObjectSizer, SizerKind};
use crate::walker::{FlyweightClassifier, ObjectGraphWalker, VisitLimit, VisitListener, WalkError};
use log::{debug, info, log_enabled, warn, Level};
use std::sync::Arc;

/// Deep sizing of object graphs: the entry point for cache accounting.
///
/// The engine is immutable and may be shared between threads; every
/// measurement gets its own visited set.
pub struct SizeOfEngine {
    model: RuntimeMemoryModel,
    walker: Arc<ObjectGraphWalker>,
    strategy: SizerKind,
    limit: VisitLimit,
    verbose: bool,
}

impl SizeOfEngine {
    pub fn new(
        model: RuntimeMemoryModel,
        facilities: &HostFacilities,
        filter: Arc<dyn SizeOfFilter>,
        config: &SizeOfConfig,
    ) -> Result<Self, SizeOfError> {
        config.validate()?;

        let fallback = FallbackSizer::new(model, facilities, &config.sizers)?;
        let strategy = fallback.selected();
        if !config.silent {
            info!("Using {} sizing on {}", strategy, model.description());
        }

        let sizer: Arc<dyn ObjectSizer> = if config.cache_structural {
            Arc::new(CachingSizer::new(Box::new(fallback)))
        } else {
            Arc::new(fallback)
        };

        let cache = FieldAndClassCache::new(filter).with_verbose(config.verbose_tracing);
        let mut walker = ObjectGraphWalker::new(sizer, Arc::new(cache)).with_verbose(config.verbose_tracing);
        if config.bypass_flyweights {
            walker = walker.with_flyweights(FlyweightClassifier::new(config.flyweights.clone()));
        }

        Ok(Self {
            model,
            walker: Arc::new(walker),
            strategy,
            limit: config.visit_limit(),
            verbose: config.verbose_tracing,
        })
    }

    /// Same sizing stack with another visited-object limit.
    pub fn copy_with(&self, max_visited_objects: u64, abort_on_limit: bool) -> Self {
        Self {
            model: self.model,
            walker: self.walker.clone(),
            strategy: self.strategy,
            limit: VisitLimit::new(max_visited_objects, abort_on_limit),
            verbose: self.verbose,
        }
    }

    pub fn model(&self) -> &RuntimeMemoryModel {
        &self.model
    }

    pub fn strategy(&self) -> SizerKind {
        self.strategy
    }

    pub fn limit(&self) -> VisitLimit {
        self.limit
    }

    /// Total size of everything reachable from `roots`, each object counted once.
    pub fn measure(&self, heap: &Heap, roots: &[Option<ObjectId>]) -> Result<Size, SizeOfError> {
        self.run(heap, roots, None)
    }

    pub fn measure_with_listener(
        &self,
        heap: &Heap,
        roots: &[Option<ObjectId>],
        listener: &mut dyn VisitListener,
    ) -> Result<Size, SizeOfError> {
        self.run(heap, roots, Some(listener))
    }

    /// Size of a cache entry: key, value and the container holding them.
    pub fn measure_entry(
        &self,
        heap: &Heap,
        key: Option<ObjectId>,
        value: Option<ObjectId>,
        container: Option<ObjectId>,
    ) -> Result<Size, SizeOfError> {
        let size = self.measure(heap, &[key, value, container])?;
        if self.verbose && log_enabled!(Level::Debug) {
            debug!("Size of {:?}/{:?}/{:?} -> {}", key, value, container, size.calculated);
        }
        Ok(size)
    }

    /// Shallow size of one object, ignoring filters and flyweights.
    pub fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizeOfError> {
        Ok(self.walker.sizer().size_of(heap, obj)?)
    }

    fn run(
        &self,
        heap: &Heap,
        roots: &[Option<ObjectId>],
        listener: Option<&mut dyn VisitListener>,
    ) -> Result<Size, SizeOfError> {
        match self.walker.walk_with_listener(heap, roots, self.limit, listener) {
            Ok(outcome) => Ok(Size::new(outcome.total, !outcome.limit_reached)),
            Err(WalkError::VisitLimitExceeded { limit, measured }) => {
                warn!(
                    "Sizing stopped after {} objects, reported size of {} bytes is not accurate; \
                     exclude parts of the graph or raise the limit",
                    limit, measured
                );
                Ok(Size::new(measured, false))
            }
            Err(WalkError::Listener(err)) => Err(err.into()),
            Err(WalkError::Filter(err)) => Err(err.into()),
            Err(WalkError::Heap(err)) => Err(err.into()),
            Err(WalkError::Sizer(err)) => Err(err.into()),
        }
    }
}
