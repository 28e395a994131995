//! Canopy: a hierarchical state machine runtime.
//!
//! Canopy manages a tree of states grouped into regions and resolves
//! transition requests into concrete activation changes, for interactive,
//! latency-sensitive applications: games, simulations, control loops.
//! Exactly one child of every active region is active at any time; the
//! engine's job is to keep that invariant while reconciling five
//! selection policies (change, restart, resume, utilize, randomize).
//!
//! # Core Concepts
//!
//! - **Hierarchy**: the immutable tree shape, built once by the builder
//! - **Activation**: which nodes are active, plus one remembered child
//!   per region for resume semantics
//! - **Transitions**: immediate (synchronous) or deferred (queued from
//!   update callbacks, applied at end of step in submission order)
//! - **Selection**: regions entered without an explicit deeper target
//!   pick a child by the request's policy: first declared, remembered,
//!   highest utility, or rank-filtered weighted random
//!
//! # Example
//!
//! ```rust
//! use canopy::MachineBuilder;
//!
//! let mut machine = MachineBuilder::new()
//!     .state("Idle")
//!     .region("Patrol", |r| {
//!         r.state("Walk");
//!         r.state("Turn");
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert!(machine.is_active("Idle"));
//!
//! machine.immediate_change_to("Patrol").unwrap();
//! assert!(machine.is_active("Walk"));
//!
//! machine.immediate_change_to("Turn").unwrap();
//! machine.immediate_resume("Idle").unwrap();
//!
//! // Patrol remembers Turn and resumes it
//! machine.immediate_resume("Patrol").unwrap();
//! assert!(machine.is_active("Turn"));
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{ActivationState, Hierarchy, NodeId, NodeKind};
pub use engine::{Control, FullControl, Machine, TransitionError, TransitionKind};
