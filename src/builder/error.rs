//! Build errors for hierarchy construction.

use thiserror::Error;

/// Errors that reject a hierarchy before a machine is created.
///
/// Construction errors are fatal: no machine is produced and nothing is
/// activated.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("hierarchy has no states. Add at least one state or region")]
    EmptyHierarchy,

    #[error("malformed hierarchy: region '{region}' has no children")]
    ChildlessRegion { region: String },

    #[error("malformed hierarchy: node name '{name}' is declared twice")]
    DuplicateName { name: String },
}
