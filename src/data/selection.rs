//! Id membership for bulk table actions.

use std::collections::BTreeSet;

/// Set of selected entity ids. Membership only; no ordering guarantee is
/// promised to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// XOR-toggle: ids already present leave the set, the rest join it.
    pub fn toggle(&mut self, ids: &[i64]) {
        for id in ids {
            if !self.ids.remove(id) {
                self.ids.insert(*id);
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_xor() {
        let mut selection = SelectionSet::new();
        selection.toggle(&[1, 2]);
        assert!(selection.contains(1));
        assert!(selection.contains(2));

        selection.toggle(&[2, 3]);
        assert!(selection.contains(1));
        assert!(!selection.contains(2));
        assert!(selection.contains(3));
    }

    #[test]
    fn double_toggle_restores_empty() {
        let mut selection = SelectionSet::new();
        selection.toggle(&[5]);
        selection.toggle(&[5]);
        assert!(selection.is_empty());
    }
}
