//! Per-node behavior hooks.
//!
//! Each node may carry up to five optional callbacks, installed through
//! the builder and dispatched through a uniform table indexed by node id.

use crate::engine::control::{Control, FullControl};

/// Rank reported by a node with no rank callback: always eligible.
pub const DEFAULT_RANK: i8 = 0;

/// Utility reported by a node with no utility callback.
pub const DEFAULT_UTILITY: f32 = 1.0;

pub(crate) type UpdateFn<Ctx> = Box<dyn Fn(&mut FullControl<'_, Ctx>) + Send + Sync>;
pub(crate) type EntryFn<Ctx> = Box<dyn Fn(&mut Ctx) + Send + Sync>;
pub(crate) type RankFn<Ctx> = Box<dyn Fn(&Control<'_, Ctx>) -> i8 + Send + Sync>;
pub(crate) type UtilityFn<Ctx> = Box<dyn Fn(&Control<'_, Ctx>) -> f32 + Send + Sync>;

/// The callback slots for one node. All slots default to empty.
pub(crate) struct Behavior<Ctx> {
    pub(crate) update: Option<UpdateFn<Ctx>>,
    pub(crate) enter: Option<EntryFn<Ctx>>,
    pub(crate) exit: Option<EntryFn<Ctx>>,
    pub(crate) rank: Option<RankFn<Ctx>>,
    pub(crate) utility: Option<UtilityFn<Ctx>>,
}

impl<Ctx> Default for Behavior<Ctx> {
    fn default() -> Self {
        Self {
            update: None,
            enter: None,
            exit: None,
            rank: None,
            utility: None,
        }
    }
}

impl<Ctx> Behavior<Ctx> {
    /// Evaluate the rank callback, falling back to [`DEFAULT_RANK`].
    pub(crate) fn rank(&self, control: &Control<'_, Ctx>) -> i8 {
        self.rank.as_ref().map_or(DEFAULT_RANK, |rank| rank(control))
    }

    /// Evaluate the utility callback, falling back to [`DEFAULT_UTILITY`].
    pub(crate) fn utility(&self, control: &Control<'_, Ctx>) -> f32 {
        self.utility
            .as_ref()
            .map_or(DEFAULT_UTILITY, |utility| utility(control))
    }
}
