//! Control handles passed to per-node callbacks.
//!
//! Rank and utility callbacks receive a read-only [`Control`]; update
//! callbacks receive a [`FullControl`], which can additionally mutate the
//! caller context and queue deferred transition requests. Neither handle
//! can touch the activation state directly, so callbacks cannot break the
//! active-set invariant mid-step.

use crate::core::{ActivationState, Hierarchy};
use crate::engine::resolver::{TransitionKind, TransitionRequest};

/// Read-only view over the running machine.
///
/// Handed to rank and utility callbacks. Exposes activation queries and
/// the caller-supplied context, nothing else.
pub struct Control<'a, Ctx> {
    pub(crate) hierarchy: &'a Hierarchy,
    pub(crate) activation: &'a ActivationState,
    pub(crate) context: &'a Ctx,
}

impl<'a, Ctx> Control<'a, Ctx> {
    /// True iff the named state or region is currently active.
    /// Unknown names read as inactive.
    pub fn is_active(&self, name: &str) -> bool {
        self.hierarchy
            .node(name)
            .is_some_and(|id| self.activation.is_active(id))
    }

    /// The caller-supplied context.
    pub fn context(&self) -> &Ctx {
        self.context
    }
}

/// Mutable control handed to update callbacks.
///
/// In addition to the queries on [`Control`], an update callback may
/// mutate the context and request transitions. Requests are deferred:
/// they take effect at the end of the current update step, in submission
/// order.
pub struct FullControl<'a, Ctx> {
    pub(crate) hierarchy: &'a Hierarchy,
    pub(crate) activation: &'a ActivationState,
    pub(crate) context: &'a mut Ctx,
    pub(crate) queue: &'a mut Vec<TransitionRequest>,
}

impl<'a, Ctx> FullControl<'a, Ctx> {
    /// True iff the named state or region is currently active, as of the
    /// start of the current update step.
    pub fn is_active(&self, name: &str) -> bool {
        self.hierarchy
            .node(name)
            .is_some_and(|id| self.activation.is_active(id))
    }

    /// The caller-supplied context.
    pub fn context(&self) -> &Ctx {
        &*self.context
    }

    /// Mutable access to the caller-supplied context.
    pub fn context_mut(&mut self) -> &mut Ctx {
        &mut *self.context
    }

    /// Request a transition into `target`, entering regions along the way
    /// through their first declared child.
    pub fn change_to(&mut self, target: &str) {
        self.request(target, TransitionKind::Change);
    }

    /// Request a transition into `target`, forcing first-child entry and
    /// overwriting remembered history.
    pub fn restart(&mut self, target: &str) {
        self.request(target, TransitionKind::Restart);
    }

    /// Request a transition into `target`, re-entering regions through
    /// their remembered children.
    pub fn resume(&mut self, target: &str) {
        self.request(target, TransitionKind::Resume);
    }

    /// Request a transition into `target`, selecting among the target
    /// region's children by the greatest utility value.
    pub fn utilize(&mut self, target: &str) {
        self.request(target, TransitionKind::Utilize);
    }

    /// Request a transition into `target`, selecting among the target
    /// region's children by rank-filtered weighted random draw.
    pub fn randomize(&mut self, target: &str) {
        self.request(target, TransitionKind::Randomize);
    }

    fn request(&mut self, target: &str, kind: TransitionKind) {
        self.queue.push(TransitionRequest::new(target, kind));
    }
}
