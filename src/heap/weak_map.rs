// Wed Jan 15 2026 - Alex

use crate::heap::{TypeDescriptor, TypeKey, TypeRef};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

const PURGE_FLOOR: usize = 64;

struct Entries<V> {
    map: AHashMap<TypeKey, (Weak<TypeDescriptor>, V)>,
    /// Map size at which the next insert sweeps out dead types.
    purge_at: usize,
}

impl<V> Entries<V> {
    fn insert(&mut self, key: TypeKey, owner: Weak<TypeDescriptor>, value: V) {
        self.maybe_purge();
        self.map.insert(key, (owner, value));
    }

    fn maybe_purge(&mut self) {
        if self.map.len() >= self.purge_at {
            self.purge();
        }
    }

    fn purge(&mut self) {
        self.map.retain(|_, (owner, _)| owner.strong_count() > 0);
        self.purge_at = (self.map.len() * 2).max(PURGE_FLOOR);
    }
}

/// Concurrent map keyed by type that does not keep its types alive.
///
/// Entries whose type has been dropped are never returned. They are swept
/// out once the map has doubled since the last sweep, so filling the map
/// stays linear. Two threads racing to fill the same key both compute the
/// value; the later insert wins.
pub struct WeakTypeMap<V> {
    entries: RwLock<Entries<V>>,
}

impl<V: Clone> WeakTypeMap<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                map: AHashMap::new(),
                purge_at: PURGE_FLOOR,
            }),
        }
    }

    pub fn get(&self, ty: &TypeRef) -> Option<V> {
        self.get_by_key(ty.key())
    }

    /// Lookup by identity token, for callers holding only a borrowed descriptor.
    pub fn get_by_key(&self, key: TypeKey) -> Option<V> {
        self.with_value(key, V::clone)
    }

    /// Runs `read` against a live entry without cloning it.
    pub fn with_value<R, F>(&self, key: TypeKey, read: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let entries = self.entries.read();
        let (owner, value) = entries.map.get(&key)?;
        if owner.strong_count() == 0 {
            return None;
        }
        Some(read(value))
    }

    pub fn insert(&self, ty: &TypeRef, value: V) {
        self.entries.write().insert(ty.key(), Arc::downgrade(ty), value);
    }

    /// Mutates the entry for `ty` in place, starting from `V::default()` when absent.
    pub fn update<F>(&self, ty: &TypeRef, apply: F)
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        let mut entries = self.entries.write();
        if !entries.map.contains_key(&ty.key()) {
            entries.insert(ty.key(), Arc::downgrade(ty), V::default());
        }
        if let Some((_, value)) = entries.map.get_mut(&ty.key()) {
            apply(value);
        }
    }

    /// Drops every entry whose type is gone.
    pub fn purge(&self) {
        self.entries.write().purge();
    }

    /// Types that are still alive.
    pub fn live_types(&self) -> Vec<TypeRef> {
        self.entries
            .read()
            .map
            .values()
            .filter_map(|(owner, _)| owner.upgrade())
            .collect()
    }

    pub fn get_or_insert_with<F>(&self, ty: &TypeRef, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(ty) {
            return value;
        }
        let value = compute();
        self.insert(ty, value.clone());
        value
    }

    pub fn try_get_or_insert_with<F, E>(&self, ty: &TypeRef, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(ty) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(ty, value.clone());
        Ok(value)
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.with_value(ty.key(), |_| ()).is_some()
    }

    /// Live entries only.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map
            .values()
            .filter(|(owner, _)| owner.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.map.clear();
        entries.purge_at = PURGE_FLOOR;
    }
}

impl<V: Clone> Default for WeakTypeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::TypeBuilder;

    fn stored(map: &WeakTypeMap<u64>) -> usize {
        map.entries.read().map.len()
    }

    #[test]
    fn test_entries_die_with_their_type() {
        let map = WeakTypeMap::new();
        let kept = TypeBuilder::class("Kept").build();
        let dropped = TypeBuilder::class("Dropped").build();
        map.insert(&kept, 1u64);
        map.insert(&dropped, 2u64);
        assert_eq!(map.len(), 2);

        drop(dropped);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&kept), Some(1));
        assert_eq!(stored(&map), 2);

        map.purge();
        assert_eq!(stored(&map), 1);
    }

    #[test]
    fn test_dead_entries_swept_as_map_grows() {
        let map = WeakTypeMap::new();
        for i in 0..PURGE_FLOOR as u64 {
            let transient = TypeBuilder::class(&format!("Transient{}", i)).build();
            map.insert(&transient, i);
        }
        assert_eq!(stored(&map), PURGE_FLOOR);
        assert!(map.is_empty());

        let survivor = TypeBuilder::class("Survivor").build();
        map.insert(&survivor, 99);
        assert_eq!(stored(&map), 1);
        assert_eq!(map.get(&survivor), Some(99));
    }

    #[test]
    fn test_with_value_borrows() {
        let map: WeakTypeMap<Vec<u32>> = WeakTypeMap::new();
        let ty = TypeBuilder::class("Holder").build();
        map.update(&ty, |values| values.push(3));
        map.update(&ty, |values| values.push(5));
        assert_eq!(map.with_value(ty.key(), |values| values.contains(&5)), Some(true));
        assert_eq!(map.with_value(TypeBuilder::class("Other").build().key(), |values| values.len()), None);
    }

    #[test]
    fn test_get_or_insert_computes_once() {
        let map = WeakTypeMap::new();
        let ty = TypeBuilder::class("Thing").build();
        let mut calls = 0;
        let first = map.get_or_insert_with(&ty, || {
            calls += 1;
            7u32
        });
        let second = map.get_or_insert_with(&ty, || {
            calls += 1;
            9u32
        });
        assert_eq!((first, second, calls), (7, 7, 1));
    }
}
