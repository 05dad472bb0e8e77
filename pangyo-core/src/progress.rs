//! Stage completion tracking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Total number of stages in the game.
pub const STAGE_COUNT: u8 = 4;

/// The set of completed stage numbers.
///
/// Grows monotonically within a playthrough; nothing removes entries short
/// of replacing the whole store.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageProgress {
    completed: BTreeSet<u8>,
}

impl StageProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a stage complete. Returns `true` if it was not already marked.
    pub fn mark_complete(&mut self, stage: u8) -> bool {
        self.completed.insert(stage)
    }

    pub fn is_complete(&self, stage: u8) -> bool {
        self.completed.contains(&stage)
    }

    /// True iff every stage 1..=4 is complete.
    pub fn all_complete(&self) -> bool {
        (1..=STAGE_COUNT).all(|stage| self.completed.contains(&stage))
    }

    pub fn completed(&self) -> impl Iterator<Item = u8> + '_ {
        self.completed.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}
