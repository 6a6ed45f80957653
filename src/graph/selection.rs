//! Selected node ids.

use std::collections::HashSet;

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// Whether the node is selected after the toggle.
    pub selected: bool,
}

/// Set of currently selected node ids.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) -> Toggle {
        if self.selected.remove(id) {
            Toggle { selected: false }
        } else {
            self.selected.insert(id.to_string());
            Toggle { selected: true }
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop every selected id for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.selected.retain(|id| keep(id));
    }

    /// Selected ids, sorted.
    pub fn selected(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.selected.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
