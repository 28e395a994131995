//! Fluent builders for declaring a hierarchy and its behaviors.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

use crate::builder::error::BuildError;
use crate::core::{Hierarchy, Node, NodeId, NodeKind};
use crate::engine::behavior::Behavior;
use crate::engine::{Control, FullControl, Machine};

/// One node under construction. Parents always precede children in the
/// definition table, which build() relies on when computing depths.
struct NodeDef<Ctx> {
    name: String,
    parent: Option<usize>,
    kind: NodeKind,
    behavior: Behavior<Ctx>,
    children: Vec<usize>,
}

fn add_node<Ctx>(
    nodes: &mut Vec<NodeDef<Ctx>>,
    parent: usize,
    name: &str,
    kind: NodeKind,
) -> usize {
    let index = nodes.len();
    nodes.push(NodeDef {
        name: name.to_string(),
        parent: Some(parent),
        kind,
        behavior: Behavior::default(),
        children: Vec::new(),
    });
    nodes[parent].children.push(index);
    index
}

/// Builder for a [`Machine`] with a fluent API.
///
/// States and regions declared directly on the builder become children
/// of the implicit root region, in declaration order. The first declared
/// child of every region is its default entry.
///
/// # Example
///
/// ```rust
/// use canopy::MachineBuilder;
///
/// let machine = MachineBuilder::new()
///     .state("Idle")
///     .region("Patrol", |r| {
///         r.state("Walk");
///         r.state("Turn");
///     })
///     .build()
///     .unwrap();
///
/// assert!(machine.is_active("Idle"));
/// ```
pub struct MachineBuilder<Ctx = ()> {
    nodes: Vec<NodeDef<Ctx>>,
    context: Ctx,
    seed: Option<u64>,
}

impl MachineBuilder<()> {
    /// Create a builder for a machine without caller context.
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl Default for MachineBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> MachineBuilder<Ctx> {
    /// Create a builder whose machine owns `context`, the value handed
    /// to rank/utility/update callbacks through their control view.
    pub fn with_context(context: Ctx) -> Self {
        Self {
            nodes: vec![NodeDef {
                name: String::new(),
                parent: None,
                kind: NodeKind::Composite,
                behavior: Behavior::default(),
                children: Vec::new(),
            }],
            context,
            seed: None,
        }
    }

    /// Seed the machine's PRNG deterministically. Without a seed the
    /// generator is seeded from process entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Declare a leaf state under the root.
    pub fn state(mut self, name: &str) -> Self {
        add_node(&mut self.nodes, 0, name, NodeKind::Leaf);
        self
    }

    /// Declare a leaf state under the root and configure its behavior.
    pub fn state_with<F>(mut self, name: &str, configure: F) -> Self
    where
        F: FnOnce(&mut StateBuilder<'_, Ctx>),
    {
        let index = add_node(&mut self.nodes, 0, name, NodeKind::Leaf);
        configure(&mut StateBuilder {
            behavior: &mut self.nodes[index].behavior,
        });
        self
    }

    /// Declare a composite region under the root and populate it.
    pub fn region<F>(mut self, name: &str, body: F) -> Self
    where
        F: FnOnce(&mut RegionBuilder<'_, Ctx>),
    {
        let index = add_node(&mut self.nodes, 0, name, NodeKind::Composite);
        body(&mut RegionBuilder {
            nodes: &mut self.nodes,
            region: index,
        });
        self
    }

    /// Validate the declared hierarchy and assemble the machine.
    ///
    /// The machine comes back already running: the root and the
    /// first-child chain below it are active and their enter callbacks
    /// have fired.
    pub fn build(self) -> Result<Machine<Ctx>, BuildError> {
        if self.nodes[0].children.is_empty() {
            return Err(BuildError::EmptyHierarchy);
        }

        // the root occupies the empty name
        let mut seen: HashSet<&str> = HashSet::from([""]);
        for def in &self.nodes[1..] {
            if !seen.insert(def.name.as_str()) {
                return Err(BuildError::DuplicateName {
                    name: def.name.clone(),
                });
            }
            if def.kind == NodeKind::Composite && def.children.is_empty() {
                return Err(BuildError::ChildlessRegion {
                    region: def.name.clone(),
                });
            }
        }

        let mut depths = vec![0u16; self.nodes.len()];
        for index in 1..self.nodes.len() {
            let parent = self.nodes[index].parent.expect("non-root node has a parent");
            depths[index] = depths[parent] + 1;
        }

        let mut behaviors = Vec::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (index, def) in self.nodes.into_iter().enumerate() {
            behaviors.push(def.behavior);
            nodes.push(Node {
                name: def.name,
                parent: def.parent.map(NodeId),
                kind: def.kind,
                depth: depths[index],
                children: def.children.into_iter().map(NodeId).collect(),
            });
        }

        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Machine::new(Hierarchy::new(nodes), behaviors, self.context, rng))
    }
}

/// Scope for populating one region. Also carries the region's own
/// behavior hooks: a region is a candidate child of its parent, so it
/// can report rank and utility like any leaf.
pub struct RegionBuilder<'a, Ctx> {
    nodes: &'a mut Vec<NodeDef<Ctx>>,
    region: usize,
}

impl<'a, Ctx> RegionBuilder<'a, Ctx> {
    /// Declare a leaf state in this region.
    pub fn state(&mut self, name: &str) -> &mut Self {
        add_node(self.nodes, self.region, name, NodeKind::Leaf);
        self
    }

    /// Declare a leaf state in this region and configure its behavior.
    pub fn state_with<F>(&mut self, name: &str, configure: F) -> &mut Self
    where
        F: FnOnce(&mut StateBuilder<'_, Ctx>),
    {
        let index = add_node(self.nodes, self.region, name, NodeKind::Leaf);
        configure(&mut StateBuilder {
            behavior: &mut self.nodes[index].behavior,
        });
        self
    }

    /// Declare a nested region and populate it.
    pub fn region<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: FnOnce(&mut RegionBuilder<'_, Ctx>),
    {
        let index = add_node(self.nodes, self.region, name, NodeKind::Composite);
        body(&mut RegionBuilder {
            nodes: &mut *self.nodes,
            region: index,
        });
        self
    }

    /// Install this region's update callback.
    pub fn on_update<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut FullControl<'_, Ctx>) + Send + Sync + 'static,
    {
        self.nodes[self.region].behavior.update = Some(Box::new(callback));
        self
    }

    /// Install this region's enter callback.
    pub fn on_enter<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.nodes[self.region].behavior.enter = Some(Box::new(callback));
        self
    }

    /// Install this region's exit callback.
    pub fn on_exit<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.nodes[self.region].behavior.exit = Some(Box::new(callback));
        self
    }

    /// Install this region's rank callback.
    pub fn rank<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Control<'_, Ctx>) -> i8 + Send + Sync + 'static,
    {
        self.nodes[self.region].behavior.rank = Some(Box::new(callback));
        self
    }

    /// Install this region's utility callback.
    pub fn utility<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Control<'_, Ctx>) -> f32 + Send + Sync + 'static,
    {
        self.nodes[self.region].behavior.utility = Some(Box::new(callback));
        self
    }
}

/// Behavior hooks for one leaf state.
pub struct StateBuilder<'a, Ctx> {
    behavior: &'a mut Behavior<Ctx>,
}

impl<'a, Ctx> StateBuilder<'a, Ctx> {
    /// Install the state's update callback, invoked once per step while
    /// the state is active. It may queue deferred transitions through
    /// its [`FullControl`] argument.
    pub fn on_update<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut FullControl<'_, Ctx>) + Send + Sync + 'static,
    {
        self.behavior.update = Some(Box::new(callback));
        self
    }

    /// Install the state's enter callback, invoked when it activates.
    pub fn on_enter<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.behavior.enter = Some(Box::new(callback));
        self
    }

    /// Install the state's exit callback, invoked when it deactivates.
    pub fn on_exit<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.behavior.exit = Some(Box::new(callback));
        self
    }

    /// Install the state's rank callback, the eligibility filter for
    /// randomized selection. States without one rank at
    /// [`DEFAULT_RANK`](crate::engine::DEFAULT_RANK).
    pub fn rank<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Control<'_, Ctx>) -> i8 + Send + Sync + 'static,
    {
        self.behavior.rank = Some(Box::new(callback));
        self
    }

    /// Install the state's utility callback, the preference score used
    /// by utility selection and as the weight in randomized selection.
    /// States without one score [`DEFAULT_UTILITY`](crate::engine::DEFAULT_UTILITY).
    pub fn utility<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Control<'_, Ctx>) -> f32 + Send + Sync + 'static,
    {
        self.behavior.utility = Some(Box::new(callback));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_an_empty_hierarchy() {
        let result = MachineBuilder::new().build();
        assert!(matches!(result, Err(BuildError::EmptyHierarchy)));
    }

    #[test]
    fn builder_rejects_a_childless_region() {
        let result = MachineBuilder::new()
            .state("Idle")
            .region("Hollow", |_| {})
            .build();
        assert!(matches!(
            result,
            Err(BuildError::ChildlessRegion { region }) if region == "Hollow"
        ));
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let result = MachineBuilder::new()
            .state("Twin")
            .region("Region", |r| {
                r.state("Twin");
            })
            .build();
        assert!(matches!(
            result,
            Err(BuildError::DuplicateName { name }) if name == "Twin"
        ));
    }

    #[test]
    fn fluent_api_builds_a_running_machine() {
        let machine = MachineBuilder::new()
            .state("First")
            .state("Second")
            .build()
            .unwrap();
        assert!(machine.is_active("First"));
        assert!(!machine.is_active("Second"));
    }

    #[test]
    fn nested_regions_build_in_declaration_order() {
        let machine = MachineBuilder::new()
            .region("Outer", |r| {
                r.region("Inner", |r| {
                    r.state("Deep");
                });
                r.state("Shallow");
            })
            .build()
            .unwrap();

        // Inner precedes Shallow, so construction descends into it
        assert!(machine.is_active("Outer"));
        assert!(machine.is_active("Inner"));
        assert!(machine.is_active("Deep"));
        assert!(!machine.is_active("Shallow"));
    }

    #[test]
    fn identical_seeds_draw_identical_outcomes() {
        let build = || {
            MachineBuilder::new()
                .seed(1234)
                .state("Start")
                .region("Region", |r| {
                    r.state("A");
                    r.state("B");
                    r.state("C");
                })
                .build()
                .unwrap()
        };

        let mut first = build();
        let mut second = build();
        first.immediate_randomize("Region").unwrap();
        second.immediate_randomize("Region").unwrap();
        assert_eq!(first.active_leaf(), second.active_leaf());
    }

    #[test]
    fn context_is_threaded_through_to_callbacks() {
        let machine = MachineBuilder::with_context(7u32)
            .state_with("Only", |s| {
                s.utility(|control| *control.context() as f32);
            })
            .build()
            .unwrap();
        assert_eq!(*machine.context(), 7);
    }
}
