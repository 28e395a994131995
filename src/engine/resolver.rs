//! Transition resolution: from a request to a concrete activation plan.
//!
//! Resolution is pure computation over a snapshot of the activation
//! state. It walks the root-to-target path to find the anchor (the
//! lowest common ancestor of the active branch and the target), decides
//! which active subtree to prune, and extends the entry path below the
//! target with the requested selection policy. Nothing is mutated here;
//! the machine commits the returned plan in one step, so a failed
//! resolution leaves the active set completely unchanged.

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ActivationState, Hierarchy, NodeId, NodeKind};
use crate::engine::behavior::Behavior;
use crate::engine::strategy;

/// The five transition-resolution policies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Enter the named target; regions along the way open on their first
    /// declared child.
    Change,
    /// Like `Change`, but explicitly overwrites remembered history with
    /// the first child.
    Restart,
    /// Re-enter regions through their remembered children, recursively.
    Resume,
    /// Pick the target region's child with the greatest utility value.
    Utilize,
    /// Pick among the target region's highest-rank children at random,
    /// weighted by utility.
    Randomize,
}

/// A single transition request: target plus policy.
///
/// Requests are consumed exactly once by a resolution pass and never
/// stored beyond the step that drains them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TransitionRequest {
    pub(crate) target: String,
    pub(crate) kind: TransitionKind,
}

impl TransitionRequest {
    pub(crate) fn new(target: &str, kind: TransitionKind) -> Self {
        Self {
            target: target.to_string(),
            kind,
        }
    }
}

/// Errors surfaced by a resolution pass. The active set is untouched in
/// every case.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The request named a state or region the hierarchy does not contain.
    #[error("unknown transition target '{target}'")]
    UnknownTarget {
        /// The name that failed to resolve.
        target: String,
    },

    /// A selection strategy ran against a region with no children. This
    /// indicates a hierarchy construction defect; the builder rejects
    /// such hierarchies up front.
    #[error("region '{region}' has no children to select from")]
    EmptyRegion {
        /// The childless region's name.
        region: String,
    },
}

/// Resolved outcome of one request: the active child to deactivate (with
/// its whole subtree) and the path to activate, anchor first, leaf last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TransitionPlan {
    pub(crate) prune: Option<NodeId>,
    pub(crate) entry: Vec<NodeId>,
}

/// Compute the activation change for a request targeting `target`.
///
/// The anchor is the deepest active node on the root-to-target path; a
/// target that is already active is re-entered through its parent. Below
/// the named target the request's policy chooses one child, and any
/// deeper regions open on their default chain: remembered children for
/// `Resume`, first children for everything else.
pub(crate) fn resolve<Ctx>(
    hierarchy: &Hierarchy,
    activation: &ActivationState,
    behaviors: &[Behavior<Ctx>],
    context: &Ctx,
    rng: &mut SmallRng,
    target: NodeId,
    kind: TransitionKind,
) -> Result<TransitionPlan, TransitionError> {
    let path = hierarchy.path_from_root(target);

    let mut anchor_index = 0;
    for (position, &node) in path.iter().enumerate() {
        if activation.is_active(node) {
            anchor_index = position;
        } else {
            break;
        }
    }
    // an already-active target re-enters through its parent
    if anchor_index == path.len() - 1 && path.len() > 1 {
        anchor_index -= 1;
    }
    let anchor = path[anchor_index];

    let prune = hierarchy
        .children(anchor)
        .iter()
        .copied()
        .find(|&child| activation.is_active(child));

    let mut entry: Vec<NodeId> = path[anchor_index..].to_vec();
    let mut cursor = target;
    let mut at_target = true;
    while hierarchy.kind(cursor) == NodeKind::Composite {
        let next = if at_target {
            match kind {
                TransitionKind::Change | TransitionKind::Restart => {
                    strategy::select_first(hierarchy, cursor)?
                }
                TransitionKind::Resume => {
                    strategy::select_remembered(hierarchy, activation, cursor)?
                }
                TransitionKind::Utilize => {
                    strategy::select_by_utility(hierarchy, activation, behaviors, context, cursor)?
                }
                TransitionKind::Randomize => strategy::select_weighted(
                    hierarchy, activation, behaviors, context, rng, cursor,
                )?,
            }
        } else if kind == TransitionKind::Resume {
            strategy::select_remembered(hierarchy, activation, cursor)?
        } else {
            strategy::select_first(hierarchy, cursor)?
        };
        entry.push(next);
        cursor = next;
        at_target = false;
    }

    Ok(TransitionPlan { prune, entry })
}
