//! GeometryOverlayStore - geometries currently rendered on the map
//!
//! The editor controller is the only writer. Readers take a [`OverlaySnapshot`],
//! a shared immutable list; every mutation builds a new list and swaps it in,
//! so a reader never observes a half-applied `replace_all`.

use std::sync::Arc;

use crate::domain::{OverlayEntry, OverlayId, Role};

/// Immutable view of the store at one revision
pub type OverlaySnapshot = Arc<Vec<OverlayEntry>>;

#[derive(Debug, Default)]
pub struct GeometryOverlayStore {
    entries: OverlaySnapshot,
    revision: u64,
}

impl GeometryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry with the same id
    ///
    /// Geometry and role are replaced together and the entry keeps its
    /// position. Returns false when the identical entry was already present.
    pub fn upsert(&mut self, entry: OverlayEntry) -> bool {
        let position = self.entries.iter().position(|e| e.id == entry.id);
        if let Some(i) = position {
            if self.entries[i] == entry {
                return false;
            }
        }
        let entries = Arc::make_mut(&mut self.entries);
        match position {
            Some(i) => entries[i] = entry,
            None => entries.push(entry),
        }
        self.bump();
        true
    }

    pub fn remove(&mut self, id: &OverlayId) -> Option<OverlayEntry> {
        let i = self.entries.iter().position(|e| &e.id == id)?;
        let removed = Arc::make_mut(&mut self.entries).remove(i);
        self.bump();
        Some(removed)
    }

    /// Drop every entry carrying `role`; returns how many went
    pub fn remove_role(&mut self, role: Role) -> usize {
        let before = self.entries.len();
        if !self.entries.iter().any(|e| e.role == role) {
            return 0;
        }
        Arc::make_mut(&mut self.entries).retain(|e| e.role != role);
        self.bump();
        before - self.entries.len()
    }

    pub fn remove_all(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries = Arc::default();
        self.bump();
    }

    /// Swap in a whole new entry list in one step
    ///
    /// Later duplicates of an id win, matching repeated `upsert` calls.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = OverlayEntry>) {
        let mut next: Vec<OverlayEntry> = Vec::new();
        for entry in entries {
            match next.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => next.push(entry),
            }
        }
        self.entries = Arc::new(next);
        self.bump();
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        Arc::clone(&self.entries)
    }

    pub fn get(&self, id: &OverlayId) -> Option<&OverlayEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic counter bumped on every effective mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Geometry, ProjectedPoint};

    fn point_entry(id: i64, x: f64, role: Role) -> OverlayEntry {
        OverlayEntry::new(id, Geometry::Point(ProjectedPoint::new(x, 0.0)), role)
    }

    #[test]
    fn test_upsert_same_id_keeps_last_geometry() {
        let mut store = GeometryOverlayStore::new();
        store.upsert(point_entry(1, 1.0, Role::Context));
        store.upsert(point_entry(1, 2.0, Role::Context));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&OverlayId::Number(1)).unwrap().geometry,
            Geometry::Point(ProjectedPoint::new(2.0, 0.0))
        );
    }

    #[test]
    fn test_upsert_overwrites_role_with_geometry() {
        let mut store = GeometryOverlayStore::new();
        store.upsert(point_entry(7, 1.0, Role::Draft));
        store.upsert(point_entry(7, 1.0, Role::Active));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, Role::Active);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = GeometryOverlayStore::new();
        assert!(store.upsert(point_entry(1, 1.0, Role::Context)));
        let revision = store.revision();
        assert!(!store.upsert(point_entry(1, 1.0, Role::Context)));
        assert_eq!(store.revision(), revision);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let mut store = GeometryOverlayStore::new();
        store.upsert(point_entry(1, 1.0, Role::Context));
        let before = store.snapshot();
        store.replace_all(vec![
            point_entry(2, 2.0, Role::Active),
            point_entry(3, 3.0, Role::Context),
        ]);
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].id, OverlayId::Number(1));
        let after = store.snapshot();
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn test_replace_all_deduplicates_ids() {
        let mut store = GeometryOverlayStore::new();
        store.replace_all(vec![
            point_entry(1, 1.0, Role::Context),
            point_entry(1, 5.0, Role::Active),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].role, Role::Active);
    }

    #[test]
    fn test_remove_role_and_remove_all() {
        let mut store = GeometryOverlayStore::new();
        store.upsert(point_entry(1, 1.0, Role::Context));
        store.upsert(point_entry(2, 2.0, Role::Draft));
        store.upsert(point_entry(3, 3.0, Role::Draft));
        assert_eq!(store.remove_role(Role::Draft), 2);
        assert_eq!(store.remove_role(Role::Draft), 0);
        assert_eq!(store.len(), 1);

        assert!(store.remove(&OverlayId::Number(9)).is_none());
        let revision = store.revision();
        store.remove_all();
        assert!(store.is_empty());
        assert!(store.revision() > revision);
    }
}
