//! Selection strategies: given one composite region, pick exactly one
//! child to enter.
//!
//! Four strategies cover the five transition kinds (direct and restart
//! entries both take the first declared child). Each strategy sees only
//! the ordered children of a single region and fails with
//! [`TransitionError::EmptyRegion`] on a childless one, which signals a
//! hierarchy construction defect rather than a runtime data error.
//!
//! Rank and utility callbacks are re-evaluated on every call. Their
//! results may depend on mutable caller context, so they are never
//! cached.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::core::{ActivationState, Hierarchy, NodeId};
use crate::engine::behavior::Behavior;
use crate::engine::control::Control;
use crate::engine::resolver::TransitionError;

fn candidates(hierarchy: &Hierarchy, region: NodeId) -> Result<&[NodeId], TransitionError> {
    let children = hierarchy.children(region);
    if children.is_empty() {
        return Err(TransitionError::EmptyRegion {
            region: hierarchy.name(region).to_string(),
        });
    }
    Ok(children)
}

/// Default entry: the region's first declared child.
pub(crate) fn select_first(
    hierarchy: &Hierarchy,
    region: NodeId,
) -> Result<NodeId, TransitionError> {
    Ok(candidates(hierarchy, region)?[0])
}

/// Resume entry: the region's remembered child, or the first child if the
/// region has never been entered.
pub(crate) fn select_remembered(
    hierarchy: &Hierarchy,
    activation: &ActivationState,
    region: NodeId,
) -> Result<NodeId, TransitionError> {
    let first = select_first(hierarchy, region)?;
    Ok(activation.remembered(region).unwrap_or(first))
}

/// Utility entry: the child with the strictly greatest utility value.
/// Ties break to the earliest child in declaration order.
pub(crate) fn select_by_utility<Ctx>(
    hierarchy: &Hierarchy,
    activation: &ActivationState,
    behaviors: &[Behavior<Ctx>],
    context: &Ctx,
    region: NodeId,
) -> Result<NodeId, TransitionError> {
    let children = candidates(hierarchy, region)?;
    let control = Control {
        hierarchy,
        activation,
        context,
    };

    let mut best = children[0];
    let mut best_utility = behaviors[best.index()].utility(&control);
    for &child in &children[1..] {
        let utility = behaviors[child.index()].utility(&control);
        if utility > best_utility {
            best = child;
            best_utility = utility;
        }
    }
    Ok(best)
}

/// Randomized entry: keep only the highest rank tier among the children,
/// then draw one of the survivors with probability proportional to its
/// utility value. Negative utilities count as zero weight; if the whole
/// tier weighs zero the draw degenerates to its first member.
pub(crate) fn select_weighted<Ctx>(
    hierarchy: &Hierarchy,
    activation: &ActivationState,
    behaviors: &[Behavior<Ctx>],
    context: &Ctx,
    rng: &mut SmallRng,
    region: NodeId,
) -> Result<NodeId, TransitionError> {
    let children = candidates(hierarchy, region)?;
    let control = Control {
        hierarchy,
        activation,
        context,
    };

    let ranks: Vec<i8> = children
        .iter()
        .map(|&child| behaviors[child.index()].rank(&control))
        .collect();
    let top = *ranks.iter().max().expect("region has children");

    let eligible: Vec<NodeId> = children
        .iter()
        .zip(&ranks)
        .filter(|&(_, &rank)| rank == top)
        .map(|(&child, _)| child)
        .collect();
    let weights: Vec<f32> = eligible
        .iter()
        .map(|&child| behaviors[child.index()].utility(&control).max(0.0))
        .collect();

    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return Ok(eligible[0]);
    }

    let roll = rng.gen_range(0.0..total);
    let mut accumulated = 0.0;
    for (&child, &weight) in eligible.iter().zip(&weights) {
        accumulated += weight;
        if roll < accumulated {
            return Ok(child);
        }
    }
    // float rounding can leave the roll at the very top of the range
    Ok(*eligible.last().expect("tier has members"))
}
