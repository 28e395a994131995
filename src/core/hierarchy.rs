//! Static hierarchy descriptor: the tree of states and regions.
//!
//! A [`Hierarchy`] is built once by the machine builder and never mutated
//! afterwards. It answers purely structural questions: parent, ordered
//! children, node kind, depth. All runtime activity lives in
//! [`ActivationState`](super::ActivationState).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identifier for a node in the hierarchy.
///
/// Ids are dense indices assigned in declaration order, with the implicit
/// root region at index zero. They remain valid for the lifetime of the
/// machine that owns the hierarchy.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of this node in the hierarchy's node table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a node is a leaf state or a composite region.
///
/// A composite region owns an ordered, non-empty list of children and has
/// exactly one of them active whenever the region itself is active.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// A state with no children; the unit of active behavior.
    Leaf,
    /// A region with one or more children.
    Composite,
}

/// A single node record. Topology is owned by the hierarchy; nodes hold
/// only their own attributes and child order.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) depth: u16,
    pub(crate) children: Vec<NodeId>,
}

/// Immutable tree shape of a state machine.
///
/// Exposes read-only structural queries. There is no mutation API:
/// topology changes after construction are not supported.
///
/// # Example
///
/// ```rust
/// use canopy::{MachineBuilder, NodeKind};
///
/// let machine = MachineBuilder::new()
///     .state("Idle")
///     .region("Combat", |r| {
///         r.state("Approach");
///         r.state("Attack");
///     })
///     .build()
///     .unwrap();
///
/// let hierarchy = machine.hierarchy();
/// let combat = hierarchy.node("Combat").unwrap();
/// assert_eq!(hierarchy.kind(combat), NodeKind::Composite);
/// assert_eq!(hierarchy.children(combat).len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl Hierarchy {
    /// Assemble a hierarchy from pre-validated node records.
    ///
    /// Callers (the builder) must guarantee that node zero is the root,
    /// every other node has a parent, and every composite has children.
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        let by_name = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.name.clone(), NodeId(index)))
            .collect();
        Self { nodes, by_name }
    }

    /// The root region. Always present and always active at runtime.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True only for a degenerate hierarchy with no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in declaration order, root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Look up a node by its declared name.
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// The declared name of a node.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// The parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The ordered children of a node. Empty for leaves.
    ///
    /// Order is significant: it is the iteration order for utility
    /// comparison and defines each region's default (first) child.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Whether a node is a leaf state or a composite region.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Distance from the root; the root itself has depth zero.
    pub fn depth(&self, id: NodeId) -> u16 {
        self.nodes[id.0].depth
    }

    /// The chain of nodes from the root down to `id`, inclusive.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.parent(cursor) {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;

    fn sample() -> Hierarchy {
        MachineBuilder::new()
            .state("Idle")
            .region("Combat", |r| {
                r.state("Approach");
                r.region("Melee", |r| {
                    r.state("Swing");
                    r.state("Recover");
                });
            })
            .build()
            .unwrap()
            .hierarchy()
            .clone()
    }

    #[test]
    fn root_is_node_zero() {
        let hierarchy = sample();
        assert_eq!(hierarchy.root(), NodeId(0));
        assert_eq!(hierarchy.parent(hierarchy.root()), None);
        assert_eq!(hierarchy.depth(hierarchy.root()), 0);
    }

    #[test]
    fn lookup_by_name_finds_every_node() {
        let hierarchy = sample();
        for name in ["Idle", "Combat", "Approach", "Melee", "Swing", "Recover"] {
            let id = hierarchy.node(name).expect("declared node");
            assert_eq!(hierarchy.name(id), name);
        }
        assert_eq!(hierarchy.node("Missing"), None);
    }

    #[test]
    fn children_preserve_declaration_order() {
        let hierarchy = sample();
        let combat = hierarchy.node("Combat").unwrap();
        let names: Vec<&str> = hierarchy
            .children(combat)
            .iter()
            .map(|&child| hierarchy.name(child))
            .collect();
        assert_eq!(names, ["Approach", "Melee"]);
    }

    #[test]
    fn kinds_distinguish_leaves_from_regions() {
        let hierarchy = sample();
        assert_eq!(hierarchy.kind(hierarchy.node("Idle").unwrap()), NodeKind::Leaf);
        assert_eq!(
            hierarchy.kind(hierarchy.node("Combat").unwrap()),
            NodeKind::Composite
        );
        assert_eq!(hierarchy.kind(hierarchy.root()), NodeKind::Composite);
    }

    #[test]
    fn path_from_root_walks_the_ancestor_chain() {
        let hierarchy = sample();
        let swing = hierarchy.node("Swing").unwrap();
        let path: Vec<&str> = hierarchy
            .path_from_root(swing)
            .iter()
            .map(|&id| hierarchy.name(id))
            .collect();
        assert_eq!(path, ["", "Combat", "Melee", "Swing"]);
    }

    #[test]
    fn depth_increases_along_the_path() {
        let hierarchy = sample();
        assert_eq!(hierarchy.depth(hierarchy.node("Idle").unwrap()), 1);
        assert_eq!(hierarchy.depth(hierarchy.node("Melee").unwrap()), 2);
        assert_eq!(hierarchy.depth(hierarchy.node("Swing").unwrap()), 3);
    }

    #[test]
    fn node_id_serializes_correctly() {
        let id = NodeId(3);
        let json = serde_json::to_string(&id).unwrap();
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
