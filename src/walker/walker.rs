// Wed Jan 15 2026 - Alex

use crate::heap::{Heap, ObjectId, Value};
use crate::introspect::FieldAndClassCache;
use crate::sizer::ObjectSizer;
use crate::walker::{FlyweightClassifier, VisitListener, WalkError};
use ahash::AHashSet;
use log::{debug, error, log_enabled, warn, Level};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

/// Ceiling on the number of distinct objects one walk processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitLimit {
    pub max_visited_objects: u64,
    pub abort_on_limit: bool,
}

impl VisitLimit {
    pub fn new(max_visited_objects: u64, abort_on_limit: bool) -> Self {
        Self {
            max_visited_objects,
            abort_on_limit,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(u64::MAX, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOutcome {
    pub total: u64,
    /// Distinct objects seen, ignored ones included.
    pub visited: u64,
    pub limit_reached: bool,
}

/// Discovers every object reachable from a set of roots exactly once and sums
/// their sizes.
///
/// Traversal uses an explicit stack, so arbitrarily long chains do not grow
/// the call stack. Shared state lives in the field cache; each walk owns its
/// visited set and stack.
pub struct ObjectGraphWalker {
    sizer: Arc<dyn ObjectSizer>,
    cache: Arc<FieldAndClassCache>,
    flyweights: Option<FlyweightClassifier>,
    verbose: bool,
}

impl ObjectGraphWalker {
    pub fn new(sizer: Arc<dyn ObjectSizer>, cache: Arc<FieldAndClassCache>) -> Self {
        Self {
            sizer,
            cache,
            flyweights: None,
            verbose: false,
        }
    }

    /// Skip shared instances recognized by `classifier`.
    pub fn with_flyweights(mut self, classifier: FlyweightClassifier) -> Self {
        self.flyweights = Some(classifier);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn sizer(&self) -> &Arc<dyn ObjectSizer> {
        &self.sizer
    }

    pub fn walk(&self, heap: &Heap, roots: &[Option<ObjectId>], limit: VisitLimit) -> Result<WalkOutcome, WalkError> {
        self.walk_with_listener(heap, roots, limit, None)
    }

    pub fn walk_with_listener(
        &self,
        heap: &Heap,
        roots: &[Option<ObjectId>],
        limit: VisitLimit,
        mut listener: Option<&mut dyn VisitListener>,
    ) -> Result<WalkOutcome, WalkError> {
        let mut trace = (self.verbose && log_enabled!(Level::Debug)).then(String::new);
        let mut to_visit: Vec<ObjectId> = roots.iter().flatten().copied().collect();
        let mut visited: AHashSet<ObjectId> = AHashSet::new();
        let mut outcome = WalkOutcome::default();

        if let Some(trace) = trace.as_mut() {
            let _ = writeln!(trace, "visiting {}", self.describe_all(heap, &to_visit));
        }

        while let Some(obj) = to_visit.pop() {
            if visited.contains(&obj) {
                continue;
            }
            if visited.len() as u64 >= limit.max_visited_objects {
                if limit.abort_on_limit {
                    return Err(WalkError::VisitLimitExceeded {
                        limit: limit.max_visited_objects,
                        measured: outcome.total,
                    });
                }
                if !outcome.limit_reached {
                    warn!(
                        "The configured limit of {} visited objects was reached while sizing an object graph; \
                         sizing continues but may be slow. Raise the limit, abort on it, or exclude parts of the graph",
                        limit.max_visited_objects
                    );
                    outcome.limit_reached = true;
                }
            }
            visited.insert(obj);
            outcome.visited += 1;

            let ty = heap.type_of(obj)?;
            if self.is_flyweight(heap, obj) || !self.cache.should_walk(ty)? {
                if let Some(trace) = trace.as_mut() {
                    let _ = writeln!(trace, "  ignored\t{} {}", ty, obj);
                }
                continue;
            }

            match ty.element_kind() {
                Some(element) if element.is_reference() => {
                    let elements = heap.array_elements(obj)?;
                    to_visit.extend(elements.iter().filter_map(Value::as_object));
                }
                Some(_) => {}
                None => {
                    for field in self.cache.filtered_fields(ty)?.iter() {
                        match heap.read_field(obj, field) {
                            Ok(value) => to_visit.extend(value.as_object()),
                            Err(err) => error!("Unable to follow {} of {}: {}", field, obj, err),
                        }
                    }
                }
            }

            let size = self.sizer.size_of(heap, obj)?;
            outcome.total += size;
            if let Some(listener) = listener.as_deref_mut() {
                listener.visited(obj, size)?;
            }
            if let Some(trace) = trace.as_mut() {
                let _ = writeln!(trace, "  {}b\t\t{} {}", size, ty, obj);
            }
        }

        if let Some(mut trace) = trace {
            let _ = write!(trace, "Total size: {} bytes", outcome.total);
            debug!("{}", trace);
        }
        Ok(outcome)
    }

    fn is_flyweight(&self, heap: &Heap, obj: ObjectId) -> bool {
        self.flyweights
            .as_ref()
            .is_some_and(|classifier| classifier.is_shared(heap, obj))
    }

    fn describe_all(&self, heap: &Heap, objects: &[ObjectId]) -> String {
        objects
            .iter()
            .map(|&obj| match heap.type_of(obj) {
                Ok(ty) => format!("{} {}", ty, obj),
                Err(_) => obj.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{PassThroughFilter, SizeOfFilter, TypeExclusionFilter};
    use crate::heap::{FieldKind, FieldSpec, TypeBuilder, TypeRef};
    use crate::model::{MemoryModelVariant, PrimitiveKind, RuntimeMemoryModel};
    use crate::sizer::StructuralSizer;
    use crate::walker::{ListenerError, RecordingListener};

    fn walker_with(filter: Arc<dyn SizeOfFilter>) -> ObjectGraphWalker {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        ObjectGraphWalker::new(
            Arc::new(StructuralSizer::new(model)),
            Arc::new(FieldAndClassCache::new(filter)),
        )
        .with_flyweights(FlyweightClassifier::default())
    }

    fn node_type(heap: &Heap) -> TypeRef {
        TypeBuilder::class("Node")
            .extends(heap.object_type())
            .field("next", FieldKind::Reference)
            .field("value", PrimitiveKind::Long)
            .build()
    }

    fn chain(heap: &mut Heap, node: &TypeRef, length: usize) -> ObjectId {
        let mut head = None;
        for _ in 0..length {
            let id = heap.new_instance(node).unwrap();
            heap.set_field(id, "next", head).unwrap();
            head = Some(id);
        }
        head.unwrap()
    }

    #[test]
    fn test_linked_list_visits_every_node_once() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let head = chain(&mut heap, &node, 100_000);
        let walker = walker_with(Arc::new(PassThroughFilter));

        let outcome = walker.walk(&heap, &[Some(head)], VisitLimit::unbounded()).unwrap();
        assert_eq!(outcome.visited, 100_000);
        assert_eq!(outcome.total, 100_000 * 32);
        assert!(!outcome.limit_reached);
    }

    #[test]
    fn test_cycles_and_shared_nodes_counted_once() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let a = heap.new_instance(&node).unwrap();
        let b = heap.new_instance(&node).unwrap();
        heap.set_field(a, "next", b).unwrap();
        heap.set_field(b, "next", a).unwrap();
        let walker = walker_with(Arc::new(PassThroughFilter));

        let outcome = walker
            .walk(&heap, &[Some(a), Some(b), Some(a)], VisitLimit::unbounded())
            .unwrap();
        assert_eq!(outcome.visited, 2);
        assert_eq!(outcome.total, 64);
    }

    #[test]
    fn test_null_and_empty_roots() {
        let heap = Heap::new();
        let walker = walker_with(Arc::new(PassThroughFilter));
        assert_eq!(walker.walk(&heap, &[None], VisitLimit::unbounded()).unwrap().total, 0);
        assert_eq!(walker.walk(&heap, &[], VisitLimit::unbounded()).unwrap().total, 0);
    }

    #[test]
    fn test_reference_arrays_are_expanded_primitive_arrays_are_not() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let refs = TypeBuilder::array("Node[]", FieldKind::Reference).build();
        let longs = TypeBuilder::array("long[]", PrimitiveKind::Long).build();
        let n = heap.new_instance(&node).unwrap();
        let arr = heap.new_array(&refs, vec![Value::Ref(n), Value::Null, Value::Ref(n)]).unwrap();
        let prim = heap.new_array(&longs, Vec::new()).unwrap();
        let walker = walker_with(Arc::new(PassThroughFilter));

        let outcome = walker.walk(&heap, &[Some(arr), Some(prim)], VisitLimit::unbounded()).unwrap();
        // Node[3]: 20 + 24 -> 48, node 32, long[0]: 24
        assert_eq!(outcome.visited, 3);
        assert_eq!(outcome.total, 48 + 32 + 24);
    }

    #[test]
    fn test_excluded_types_are_neither_sized_nor_expanded() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let wrapper = TypeBuilder::class("Wrapper")
            .extends(heap.object_type())
            .field("inner", FieldKind::Reference)
            .build();
        let w = heap.new_instance(&wrapper).unwrap();
        let n = heap.new_instance(&node).unwrap();
        heap.set_field(w, "inner", n).unwrap();

        let types = Arc::new(TypeExclusionFilter::new());
        types.add_type(&wrapper, true);
        let walker = walker_with(types);
        let outcome = walker.walk(&heap, &[Some(w)], VisitLimit::unbounded()).unwrap();
        assert_eq!((outcome.total, outcome.visited), (0, 1));
    }

    #[test]
    fn test_inaccessible_field_is_not_followed() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let vault = TypeBuilder::class("Vault")
            .extends(heap.object_type())
            .field_spec(FieldSpec::new("secret", FieldKind::Reference).inaccessible())
            .build();
        let v = heap.new_instance(&vault).unwrap();
        let n = heap.new_instance(&node).unwrap();
        heap.set_field(v, "secret", n).unwrap();

        let outcome = walker_with(Arc::new(PassThroughFilter))
            .walk(&heap, &[Some(v)], VisitLimit::unbounded())
            .unwrap();
        assert_eq!(outcome.visited, 1);
        assert_eq!(outcome.total, 24);
    }

    #[test]
    fn test_flyweights_are_skipped() {
        let mut heap = Heap::new();
        let holder = TypeBuilder::class("Holder")
            .extends(heap.object_type())
            .field("a", FieldKind::Reference)
            .field("b", FieldKind::Reference)
            .build();
        let h = heap.new_instance(&holder).unwrap();
        let small = heap.box_int(1).unwrap();
        let big = heap.box_int(100_000).unwrap();
        heap.set_field(h, "a", small).unwrap();
        heap.set_field(h, "b", big).unwrap();

        let walker = walker_with(Arc::new(PassThroughFilter));
        let outcome = walker.walk(&heap, &[Some(h)], VisitLimit::unbounded()).unwrap();
        // holder 32, boxed int 16 + 4 -> 24
        assert_eq!(outcome.total, 32 + 24);
        assert_eq!(outcome.visited, 3);
    }

    #[test]
    fn test_limit_aborts_or_warns() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let head = chain(&mut heap, &node, 10);
        let walker = walker_with(Arc::new(PassThroughFilter));

        let err = walker.walk(&heap, &[Some(head)], VisitLimit::new(4, true)).unwrap_err();
        assert_eq!(err, WalkError::VisitLimitExceeded { limit: 4, measured: 4 * 32 });

        let outcome = walker.walk(&heap, &[Some(head)], VisitLimit::new(4, false)).unwrap();
        assert!(outcome.limit_reached);
        assert_eq!(outcome.total, 10 * 32);

        let exact = walker.walk(&heap, &[Some(head)], VisitLimit::new(10, true)).unwrap();
        assert!(!exact.limit_reached);
    }

    #[test]
    fn test_listener_sees_each_visit_and_can_stop_the_walk() {
        let mut heap = Heap::new();
        let node = node_type(&heap);
        let head = chain(&mut heap, &node, 5);
        let walker = walker_with(Arc::new(PassThroughFilter));

        let mut recorder = RecordingListener::new();
        let outcome = walker
            .walk_with_listener(&heap, &[Some(head)], VisitLimit::unbounded(), Some(&mut recorder))
            .unwrap();
        assert_eq!(recorder.visits.len(), 5);
        assert_eq!(recorder.visits[0].0, head);
        assert_eq!(recorder.total(), outcome.total);

        let mut seen = 0;
        let mut stop_after_two = |_obj: ObjectId, _size: u64| {
            seen += 1;
            if seen == 2 {
                Err(ListenerError::new("enough"))
            } else {
                Ok(())
            }
        };
        let err = walker
            .walk_with_listener(&heap, &[Some(head)], VisitLimit::unbounded(), Some(&mut stop_after_two))
            .unwrap_err();
        assert_eq!(err, WalkError::Listener(ListenerError::new("enough")));
    }
}
