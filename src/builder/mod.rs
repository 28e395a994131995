//! Builder API for declaring hierarchies with minimal boilerplate.
//!
//! A machine is declared top-down: leaf states and regions under the
//! implicit root, nested regions through closures, per-state behaviors
//! through [`StateBuilder`] hooks. `build()` validates the tree shape
//! (no childless regions, no duplicate names) and returns the machine
//! already running in its default branch.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::{MachineBuilder, RegionBuilder, StateBuilder};
