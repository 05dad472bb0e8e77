//! GameSession - the primary public API for a playthrough.
//!
//! One session object owns all game state: the session flags, the dialogue
//! log for the active stage, the inventory, the stage progress, and the
//! key-value store the two durable pieces are written to. Stage controllers
//! and front ends mutate state only through this object.

use crate::dialogue::{DialogueLog, DialogueTurn};
use crate::items::{InventoryItem, Inventory};
use crate::persist::{self, KeyValueStore, MemoryStore, PersistError};
use crate::progress::{StageProgress, STAGE_COUNT};

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("stage number out of range: {0}")]
    InvalidStage(u8),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("API error: {0}")]
    Api(#[from] pangyo_api::Error),
}

/// How a piece of presentation media settled.
///
/// The intro and transition videos report completion through one event; a
/// failed or skipped playback takes the same continuation as a natural end
/// so broken media never blocks progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOutcome {
    Finished,
    Skipped,
    Failed,
}

/// The session-wide flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub game_started: bool,
    pub current_stage: u8,
    pub is_transitioning: bool,
    pub show_start_video: bool,
    pub game_finished: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            game_started: false,
            current_stage: 1,
            is_transitioning: false,
            show_start_video: false,
            game_finished: false,
        }
    }
}

/// Fence for asynchronous collaborator replies.
///
/// A token is taken when a stage becomes active; a reply carrying a stale
/// token must not mutate the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageToken(u64);

/// A Pangyo Survival playthrough.
pub struct GameSession {
    state: SessionState,
    dialogue: DialogueLog,
    inventory: Inventory,
    progress: StageProgress,
    store: Box<dyn KeyValueStore>,
    pending_unlock: Option<InventoryItem>,
    epoch: u64,
}

impl GameSession {
    /// Create a session backed by the given store, restoring the persisted
    /// inventory and progress.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let inventory = persist::load_inventory(store.as_ref());
        let progress = persist::load_progress(store.as_ref());
        Self {
            state: SessionState::default(),
            dialogue: DialogueLog::new(),
            inventory,
            progress,
            store,
            pending_unlock: None,
            epoch: 0,
        }
    }

    /// Create a throwaway session with no persistence.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    // ========================================================================
    // Session flow
    // ========================================================================

    /// Begin a playthrough: the intro video is now pending.
    pub fn start_game(&mut self) {
        self.state.show_start_video = true;
    }

    /// The intro media settled; the game proper begins regardless of how.
    pub fn complete_start_video(&mut self, outcome: MediaOutcome) {
        if !self.state.show_start_video {
            return;
        }
        if outcome == MediaOutcome::Failed {
            tracing::warn!("intro video failed, continuing anyway");
        }
        self.state.show_start_video = false;
        self.state.game_started = true;
    }

    /// The active stage finished; the transition media is now playing.
    pub fn go_to_next_stage(&mut self) {
        self.state.is_transitioning = true;
    }

    /// The transition media settled: record the finished stage, advance,
    /// and reset the dialogue pane.
    pub fn complete_transition(&mut self, outcome: MediaOutcome) {
        if !self.state.is_transitioning {
            return;
        }
        if outcome == MediaOutcome::Failed {
            tracing::warn!(stage = self.state.current_stage, "transition video failed, continuing anyway");
        }

        let finished = self.state.current_stage;
        if self.progress.mark_complete(finished) {
            self.persist_progress();
        }
        if self.state.current_stage < STAGE_COUNT {
            self.state.current_stage += 1;
        }
        self.dialogue.clear();
        self.state.is_transitioning = false;
        self.epoch += 1;
    }

    /// Jump directly to a stage (stage select / replay). Does not touch
    /// progress.
    pub fn set_stage(&mut self, stage: u8) -> Result<(), SessionError> {
        if !(1..=STAGE_COUNT).contains(&stage) {
            return Err(SessionError::InvalidStage(stage));
        }
        self.state.current_stage = stage;
        self.state.game_finished = false;
        self.state.is_transitioning = false;
        self.dialogue.clear();
        self.epoch += 1;
        Ok(())
    }

    /// Terminal success: stage 4 passed, no further stage.
    pub fn finish_game(&mut self) {
        if self.progress.mark_complete(STAGE_COUNT) {
            self.persist_progress();
        }
        self.state.game_finished = true;
        self.epoch += 1;
    }

    /// Hard reset back to the main screen. Inventory and progress survive
    /// for replay; everything else is cleared.
    pub fn return_to_main(&mut self) {
        self.state = SessionState::default();
        self.dialogue.clear();
        self.pending_unlock = None;
        self.epoch += 1;
    }

    /// True iff every stage has been completed.
    pub fn has_completed_all_stages(&self) -> bool {
        self.progress.all_complete()
    }

    // ========================================================================
    // Stage support
    // ========================================================================

    /// Token for the currently active stage.
    pub fn stage_token(&self) -> StageToken {
        StageToken(self.epoch)
    }

    /// Whether a token still refers to the active stage.
    pub fn is_current(&self, token: StageToken) -> bool {
        token.0 == self.epoch
    }

    pub fn push_dialogue(&mut self, turn: DialogueTurn) {
        self.dialogue.push(turn);
    }

    pub fn say_npc(&mut self, text: impl Into<String>) {
        self.dialogue.push(DialogueTurn::npc(text));
    }

    pub fn say_user(&mut self, text: impl Into<String>) {
        self.dialogue.push(DialogueTurn::user(text));
    }

    pub fn clear_dialogue(&mut self) {
        self.dialogue.clear();
    }

    /// Grant an item. Idempotent by id; the unlock notification fires only
    /// when the item is newly added. Returns `true` on a new add.
    pub fn award_item(&mut self, item: &InventoryItem) -> bool {
        if !self.inventory.add(item.clone()) {
            return false;
        }
        self.pending_unlock = Some(item.clone());
        if let Err(e) = persist::save_inventory(self.store.as_mut(), &self.inventory) {
            tracing::warn!(item = %item.id, error = %e, "failed to persist inventory");
        }
        true
    }

    /// Take the pending unlock notification, if any.
    pub fn take_unlock_notification(&mut self) -> Option<InventoryItem> {
        self.pending_unlock.take()
    }

    fn persist_progress(&mut self) {
        if let Err(e) = persist::save_progress(self.store.as_mut(), &self.progress) {
            tracing::warn!(error = %e, "failed to persist stage progress");
        }
    }

    // ========================================================================
    // State queries
    // ========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_stage(&self) -> u8 {
        self.state.current_stage
    }

    pub fn game_started(&self) -> bool {
        self.state.game_started
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    pub fn game_finished(&self) -> bool {
        self.state.game_finished
    }

    pub fn dialogue(&self) -> &DialogueLog {
        &self.dialogue
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn progress(&self) -> &StageProgress {
        &self.progress
    }
}
