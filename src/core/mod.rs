//! Pure structural core of the state machine.
//!
//! This module contains the side-effect-free half of the runtime:
//! - The immutable [`Hierarchy`] descriptor (tree shape, node kinds,
//!   child order)
//! - The [`ActivationState`] record (active flags plus remembered-child
//!   history per region)
//!
//! Everything here is plain data with read-only queries; the transition
//! resolver in [`crate::engine`] is the only code that mutates an
//! activation state, and only when committing a fully validated plan.

mod activation;
mod hierarchy;

pub use activation::ActivationState;
pub use hierarchy::{Hierarchy, NodeId, NodeKind};

pub(crate) use hierarchy::Node;
