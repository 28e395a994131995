//! The machine instance: owned state plus the public transition API.

use rand::rngs::SmallRng;

use crate::core::{ActivationState, Hierarchy, NodeId, NodeKind};
use crate::engine::behavior::Behavior;
use crate::engine::control::FullControl;
use crate::engine::resolver::{
    resolve, TransitionError, TransitionKind, TransitionPlan, TransitionRequest,
};

/// A running hierarchical state machine.
///
/// Owns the immutable [`Hierarchy`], the mutable [`ActivationState`], the
/// per-node behavior table, the caller context, the deferred request
/// queue, and the PRNG used by randomized selection. Built through
/// [`MachineBuilder`](crate::builder::MachineBuilder); immediately after
/// construction the root region and its first-child chain are active.
///
/// The machine is single-threaded and cooperative: one update step runs
/// to completion before the next begins, and nothing here blocks or
/// performs I/O.
///
/// # Example
///
/// ```rust
/// use canopy::MachineBuilder;
///
/// let mut machine = MachineBuilder::new()
///     .state("Origin")
///     .region("Destination", |r| {
///         r.state("SubState1");
///         r.state("SubState2");
///     })
///     .build()
///     .unwrap();
///
/// assert!(machine.is_active("Origin"));
///
/// machine.immediate_change_to("Destination").unwrap();
/// assert!(machine.is_active("Destination"));
/// assert!(machine.is_active("SubState1"));
/// ```
pub struct Machine<Ctx = ()> {
    hierarchy: Hierarchy,
    activation: ActivationState,
    behaviors: Vec<Behavior<Ctx>>,
    queue: Vec<TransitionRequest>,
    rng: SmallRng,
    context: Ctx,
}

impl<Ctx> Machine<Ctx> {
    /// Assemble a machine and enter its default branch: the root, then
    /// every region's first declared child down to a leaf. Enter
    /// callbacks fire for the whole initial path.
    pub(crate) fn new(
        hierarchy: Hierarchy,
        behaviors: Vec<Behavior<Ctx>>,
        context: Ctx,
        rng: SmallRng,
    ) -> Self {
        let activation = ActivationState::new(hierarchy.len());
        let mut machine = Self {
            hierarchy,
            activation,
            behaviors,
            queue: Vec::new(),
            rng,
            context,
        };
        let root = machine.hierarchy.root();
        let plan = machine
            .resolve_for(root, TransitionKind::Change)
            .expect("builder rejects childless regions");
        machine.commit(plan);
        machine
    }

    /// The machine's immutable hierarchy descriptor.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The current activation record: active flags and remembered
    /// children. Read-only; useful for snapshots and assertions.
    pub fn activation(&self) -> &ActivationState {
        &self.activation
    }

    /// The caller-supplied context.
    pub fn context(&self) -> &Ctx {
        &self.context
    }

    /// Mutable access to the caller-supplied context.
    pub fn context_mut(&mut self) -> &mut Ctx {
        &mut self.context
    }

    /// True iff the named state or region is currently active. Unknown
    /// names read as inactive.
    pub fn is_active(&self, name: &str) -> bool {
        self.hierarchy
            .node(name)
            .is_some_and(|id| self.activation.is_active(id))
    }

    /// True iff the named node is its parent region's remembered child
    /// while not being active itself, i.e. a resume into the parent
    /// would bring it back.
    pub fn is_resumable(&self, name: &str) -> bool {
        let Some(id) = self.hierarchy.node(name) else {
            return false;
        };
        let Some(parent) = self.hierarchy.parent(id) else {
            return false;
        };
        self.activation.remembered(parent) == Some(id) && !self.activation.is_active(id)
    }

    /// Name of the deepest active node. Right after construction this is
    /// the end of the first-child chain.
    pub fn active_leaf(&self) -> &str {
        let path = self.active_path();
        let deepest = *path.last().expect("root is always active");
        self.hierarchy.name(deepest)
    }

    /// Synchronous transition into `target` with first-child entry for
    /// any region the resolution has to open.
    pub fn immediate_change_to(&mut self, target: &str) -> Result<(), TransitionError> {
        self.immediate(target, TransitionKind::Change)
    }

    /// Synchronous transition into `target`, forcing first-child entry
    /// and overwriting remembered history along the way.
    pub fn immediate_restart(&mut self, target: &str) -> Result<(), TransitionError> {
        self.immediate(target, TransitionKind::Restart)
    }

    /// Synchronous transition into `target`, re-entering regions through
    /// their remembered children.
    pub fn immediate_resume(&mut self, target: &str) -> Result<(), TransitionError> {
        self.immediate(target, TransitionKind::Resume)
    }

    /// Synchronous transition into `target`, choosing among the target
    /// region's children by the greatest utility value.
    pub fn immediate_utilize(&mut self, target: &str) -> Result<(), TransitionError> {
        self.immediate(target, TransitionKind::Utilize)
    }

    /// Synchronous transition into `target`, choosing among the target
    /// region's highest-rank children at random, weighted by utility.
    pub fn immediate_randomize(&mut self, target: &str) -> Result<(), TransitionError> {
        self.immediate(target, TransitionKind::Randomize)
    }

    /// Queue a `Change` transition for the next [`update`](Self::update).
    pub fn change_to(&mut self, target: &str) {
        self.queue.push(TransitionRequest::new(target, TransitionKind::Change));
    }

    /// Queue a `Restart` transition for the next [`update`](Self::update).
    pub fn restart(&mut self, target: &str) {
        self.queue.push(TransitionRequest::new(target, TransitionKind::Restart));
    }

    /// Queue a `Resume` transition for the next [`update`](Self::update).
    pub fn resume(&mut self, target: &str) {
        self.queue.push(TransitionRequest::new(target, TransitionKind::Resume));
    }

    /// Queue a `Utilize` transition for the next [`update`](Self::update).
    pub fn utilize(&mut self, target: &str) {
        self.queue.push(TransitionRequest::new(target, TransitionKind::Utilize));
    }

    /// Queue a `Randomize` transition for the next [`update`](Self::update).
    pub fn randomize(&mut self, target: &str) {
        self.queue.push(TransitionRequest::new(target, TransitionKind::Randomize));
    }

    /// Run one step.
    ///
    /// Invokes the update callbacks of every node that was active at the
    /// start of the step, outermost first, then drains the deferred
    /// request queue in submission order. Each drained request resolves
    /// against the activation state left by the previous one. The first
    /// failing request aborts the drain, discards the rest of the queue,
    /// and surfaces its error; transitions already applied stay applied.
    pub fn update(&mut self) -> Result<(), TransitionError> {
        let step_path = self.active_path();
        for id in step_path {
            if let Some(update) = self.behaviors[id.index()].update.as_ref() {
                let mut control = FullControl {
                    hierarchy: &self.hierarchy,
                    activation: &self.activation,
                    context: &mut self.context,
                    queue: &mut self.queue,
                };
                update(&mut control);
            }
        }

        let queued = std::mem::take(&mut self.queue);
        for request in queued {
            self.immediate(&request.target, request.kind)?;
        }
        Ok(())
    }

    fn immediate(&mut self, target: &str, kind: TransitionKind) -> Result<(), TransitionError> {
        let id = self
            .hierarchy
            .node(target)
            .ok_or_else(|| TransitionError::UnknownTarget {
                target: target.to_string(),
            })?;
        let plan = self.resolve_for(id, kind)?;
        self.commit(plan);
        Ok(())
    }

    fn resolve_for(
        &mut self,
        target: NodeId,
        kind: TransitionKind,
    ) -> Result<TransitionPlan, TransitionError> {
        resolve(
            &self.hierarchy,
            &self.activation,
            &self.behaviors,
            &self.context,
            &mut self.rng,
            target,
            kind,
        )
    }

    /// Apply a validated plan: exit callbacks bottom-up over the pruned
    /// subtree, then the activation flip, then enter callbacks top-down
    /// over the newly activated nodes. This is the only place the
    /// activation state mutates.
    fn commit(&mut self, plan: TransitionPlan) {
        if let Some(prune) = plan.prune {
            let mut pruned = Vec::new();
            collect_active(&self.hierarchy, &self.activation, prune, &mut pruned);
            for &id in pruned.iter().rev() {
                if let Some(exit) = self.behaviors[id.index()].exit.as_ref() {
                    exit(&mut self.context);
                }
            }
            self.activation.deactivate(&self.hierarchy, prune);
        }

        let newly_active: Vec<NodeId> = plan
            .entry
            .iter()
            .copied()
            .filter(|&id| !self.activation.is_active(id))
            .collect();
        self.activation.activate(&self.hierarchy, &plan.entry);
        for id in newly_active {
            if let Some(enter) = self.behaviors[id.index()].enter.as_ref() {
                enter(&mut self.context);
            }
        }
    }

    /// The chain of active nodes from the root to the active leaf.
    fn active_path(&self) -> Vec<NodeId> {
        let mut path = vec![self.hierarchy.root()];
        let mut cursor = self.hierarchy.root();
        while self.hierarchy.kind(cursor) == NodeKind::Composite {
            let Some(next) = self
                .hierarchy
                .children(cursor)
                .iter()
                .copied()
                .find(|&child| self.activation.is_active(child))
            else {
                break;
            };
            path.push(next);
            cursor = next;
        }
        path
    }
}

/// Pre-order collection of the active nodes under (and including) `root`.
fn collect_active(
    hierarchy: &Hierarchy,
    activation: &ActivationState,
    root: NodeId,
    out: &mut Vec<NodeId>,
) {
    if !activation.is_active(root) {
        return;
    }
    out.push(root);
    for &child in hierarchy.children(root) {
        collect_active(hierarchy, activation, child, out);
    }
}
