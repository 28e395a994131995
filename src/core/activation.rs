//! Runtime activation flags and per-region history.
//!
//! [`ActivationState`] is the single mutable source of truth for "which
//! nodes are active right now". It also keeps one remembered-child slot
//! per region, which survives deactivation and drives resume semantics.

use super::hierarchy::{Hierarchy, NodeId};

/// The active set plus remembered-child records.
///
/// The active set is always the union of paths from the root to one
/// active leaf, with exactly one active child under every active region.
/// The two mutators, [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate), are only invoked when a transition
/// resolver commits a fully validated plan, so the invariant never breaks
/// in an observable way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationState {
    active: Vec<bool>,
    remembered: Vec<Option<NodeId>>,
}

impl ActivationState {
    /// A fully inactive state sized for `len` nodes.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            active: vec![false; len],
            remembered: vec![None; len],
        }
    }

    /// True iff the node is in the active set.
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active[id.index()]
    }

    /// The child a region last had active, if it has ever been entered.
    ///
    /// `None` means the region should fall back to its first declared
    /// child on a resume-style entry.
    pub fn remembered(&self, id: NodeId) -> Option<NodeId> {
        self.remembered[id.index()]
    }

    /// Mark every node on `path` active.
    ///
    /// For each composite on the path the next-deeper node is recorded as
    /// that region's remembered child. Re-activating an already active
    /// node is harmless and still refreshes the remembered record.
    pub(crate) fn activate(&mut self, hierarchy: &Hierarchy, path: &[NodeId]) {
        for (position, &id) in path.iter().enumerate() {
            self.active[id.index()] = true;
            if let Some(&next) = path.get(position + 1) {
                debug_assert!(hierarchy.children(id).contains(&next));
                self.remembered[id.index()] = Some(next);
            }
        }
    }

    /// Mark `subtree_root` and all its currently active descendants
    /// inactive. Remembered records are left untouched so history
    /// persists across deactivation cycles.
    pub(crate) fn deactivate(&mut self, hierarchy: &Hierarchy, subtree_root: NodeId) {
        if !self.active[subtree_root.index()] {
            // an inactive node cannot have active descendants
            return;
        }
        self.active[subtree_root.index()] = false;
        for &child in hierarchy.children(subtree_root) {
            self.deactivate(hierarchy, child);
        }
    }
}
