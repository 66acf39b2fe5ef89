//! Cross-page selection store.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::model::RecordId;

/// Set of selected record identifiers, independent of the rendered page.
///
/// The store is a handle: clones share the same set, so a background bulk
/// select and the view mutate one selection. Each operation takes the lock
/// once, so interleaved toggles and bulk inserts apply in call order.
///
/// # Example
///
/// ```
/// use artic_lib::SelectionStore;
///
/// let selection = SelectionStore::new();
/// selection.toggle(42, true);
/// selection.toggle(42, true);
///
/// assert!(selection.is_selected(42));
/// assert_eq!(selection.len(), 1);
///
/// selection.toggle(42, false);
/// assert!(selection.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: Arc<RwLock<HashSet<RecordId>>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.read(|selected| selected.contains(&id))
    }

    /// Selects `id` when `on` is true, deselects it otherwise.
    ///
    /// Returns `true` if the selection changed.
    pub fn toggle(&self, id: RecordId, on: bool) -> bool {
        self.write(|selected| {
            if on {
                selected.insert(id)
            } else {
                selected.remove(&id)
            }
        })
    }

    /// Selects `id`. Returns `true` if it was not selected before.
    pub fn insert(&self, id: RecordId) -> bool {
        self.toggle(id, true)
    }

    /// Selects every id in `ids`. Returns how many were newly selected.
    pub fn extend(&self, ids: impl IntoIterator<Item = RecordId>) -> usize {
        self.write(|selected| ids.into_iter().filter(|&id| selected.insert(id)).count())
    }

    /// Returns a snapshot of the selected ids.
    pub fn selected_ids(&self) -> HashSet<RecordId> {
        self.read(HashSet::clone)
    }

    pub fn len(&self) -> usize {
        self.read(HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(HashSet::is_empty)
    }

    /// Deselects everything.
    pub fn clear(&self) {
        self.write(HashSet::clear);
    }

    // A HashSet is never left half-updated, so a poisoned lock is still usable.
    fn read<T>(&self, f: impl FnOnce(&HashSet<RecordId>) -> T) -> T {
        let guard = self.selected.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut HashSet<RecordId>) -> T) -> T {
        let mut guard = self.selected.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
