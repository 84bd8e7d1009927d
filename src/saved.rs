use dashmap::DashMap;

/// Session-local registry of attractions the user has starred. Keyed by
/// attraction uuid; entries appear on first toggle and live until the
/// process ends. Nothing is persisted.
///
/// `toggle` is a read-modify-write against the current value for that key,
/// done under the map's shard lock so rapid repeated toggles are each
/// observed even on a multi-threaded runtime.
#[derive(Debug, Default)]
pub struct SavedItemsRegistry {
    items: DashMap<String, bool>,
}

impl SavedItemsRegistry {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Flips the saved flag for `id`. An id never toggled before counts as
    /// unsaved, so the first toggle saves it.
    pub fn toggle(&self, id: &str) {
        let mut entry = self.items.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
    }

    /// Current flag for `id`; false for ids never toggled.
    pub fn is_saved(&self, id: &str) -> bool {
        self.items.get(id).map(|entry| *entry).unwrap_or(false)
    }

    /// Number of ids that have ever been toggled (saved or since unsaved).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
