//! Headless game interface for programmatic use.
//!
//! This module provides a simplified interface for running playthroughs
//! without a front end. It's designed for:
//! - Automated testing with the real collaborator services
//! - Scripted or agent-driven playthroughs
//! - The line-based CLI
//!
//! # Example
//!
//! ```ignore
//! use pangyo_core::headless::{HeadlessConfig, HeadlessGame, StagePrompt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = HeadlessGame::new(HeadlessConfig::offline()).await?;
//!
//!     loop {
//!         for turn in game.drain_new_lines() {
//!             println!("[{:?}] {}", turn.sender, turn.text);
//!         }
//!         match game.prompt() {
//!             StagePrompt::Choices(choices) => {
//!                 game.choose(choices.len() - 1).await?;
//!             }
//!             StagePrompt::FreeText => {
//!                 game.say("휴가는 8월 14일, 백업은 김님, 연락은 슬랙으로!").await?;
//!             }
//!             StagePrompt::Finished => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::persist::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::session::{GameSession, MediaOutcome, SessionError};
use crate::stages::{ChoiceStage, Stage2, Stage3, Stage4};
use crate::{dialogue::DialogueTurn, stages};
use pangyo_api::PangyoClient;
use std::path::PathBuf;

/// Configuration for a headless playthrough.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Use the remote collaborators. Off means fully scripted stages.
    pub remote: bool,
    /// Base URL for the collaborator services; `PANGYO_API_URL` or the
    /// default when unset.
    pub base_url: Option<String>,
    /// Persist inventory and progress to this file; in-memory when unset.
    pub save_path: Option<PathBuf>,
}

impl HeadlessConfig {
    /// Fully scripted: no network at all.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Generated scenarios and remote evaluation.
    pub fn remote() -> Self {
        Self {
            remote: true,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }
}

/// What the game is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagePrompt {
    /// Pick one of these options by index.
    Choices(Vec<String>),
    /// Type free text (a chat message, a mail draft, meeting minutes).
    FreeText,
    /// The playthrough is over.
    Finished,
}

enum ActiveStage {
    Choice(ChoiceStage),
    Chat(Stage2),
    Absence(Stage3),
    Minutes(Stage4),
    Done,
}

/// A playthrough that can be driven programmatically.
///
/// Wraps [`GameSession`] and the four stage controllers behind one
/// prompt/answer surface. Stage transitions settle immediately; there is no
/// media to wait for here.
pub struct HeadlessGame {
    session: GameSession,
    client: Option<PangyoClient>,
    active: ActiveStage,
    cursor: usize,
}

impl HeadlessGame {
    pub async fn new(config: HeadlessConfig) -> Result<Self, SessionError> {
        let store: Box<dyn KeyValueStore> = match &config.save_path {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };
        let client = config.remote.then(|| match &config.base_url {
            Some(url) => PangyoClient::new(url.clone()),
            None => PangyoClient::from_env(),
        });

        let mut session = GameSession::new(store);
        session.start_game();
        session.complete_start_video(MediaOutcome::Finished);

        let mut game = Self {
            session,
            client,
            active: ActiveStage::Done,
            cursor: 0,
        };
        game.enter_stage().await;
        Ok(game)
    }

    /// What the game is currently waiting for.
    pub fn prompt(&self) -> StagePrompt {
        match &self.active {
            ActiveStage::Choice(stage) => StagePrompt::Choices(stage.choices().to_vec()),
            ActiveStage::Chat(_) | ActiveStage::Absence(_) | ActiveStage::Minutes(_) => {
                StagePrompt::FreeText
            }
            ActiveStage::Done => StagePrompt::Finished,
        }
    }

    /// Answer a [`StagePrompt::Choices`] prompt.
    pub async fn choose(&mut self, index: usize) -> Result<(), SessionError> {
        if let ActiveStage::Choice(stage) = &mut self.active {
            stage.choose(&mut self.session, index);
        }
        self.advance_if_done().await;
        Ok(())
    }

    /// Answer a [`StagePrompt::FreeText`] prompt.
    pub async fn say(&mut self, text: &str) -> Result<(), SessionError> {
        match &mut self.active {
            ActiveStage::Chat(stage) => {
                if let Some(client) = &self.client {
                    stage.exchange(&mut self.session, client, text).await;
                }
            }
            ActiveStage::Absence(stage) => {
                stage.submit(&mut self.session, text);
            }
            ActiveStage::Minutes(stage) => {
                if let Some(client) = &self.client {
                    stage.exchange(&mut self.session, client, text).await;
                } else {
                    stage.submit(&mut self.session, text);
                }
            }
            ActiveStage::Choice(_) | ActiveStage::Done => {}
        }
        self.advance_if_done().await;
        Ok(())
    }

    /// Dialogue lines produced since the last call.
    ///
    /// The cursor follows the session log; a cleared log (stage change)
    /// resets it.
    pub fn drain_new_lines(&mut self) -> Vec<DialogueTurn> {
        let turns = self.session.dialogue().turns();
        if self.cursor > turns.len() {
            self.cursor = 0;
        }
        let new = turns[self.cursor..].to_vec();
        self.cursor = turns.len();
        new
    }

    /// The item unlocked since the last call, if any.
    pub fn take_unlock(&mut self) -> Option<crate::items::InventoryItem> {
        self.session.take_unlock_notification()
    }

    pub fn current_stage(&self) -> u8 {
        self.session.current_stage()
    }

    pub fn is_finished(&self) -> bool {
        self.session.game_finished()
    }

    /// The underlying session for advanced use.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Settle a finished stage and load the next controller.
    async fn advance_if_done(&mut self) {
        if self.session.game_finished() {
            self.active = ActiveStage::Done;
            return;
        }
        if self.session.is_transitioning() {
            // No media here; the transition settles at once.
            self.session.complete_transition(MediaOutcome::Finished);
            self.cursor = 0;
            self.enter_stage().await;
        }
    }

    async fn enter_stage(&mut self) {
        let stage = self.session.current_stage();
        self.active = match (stage, &self.client) {
            (1, Some(client)) => ActiveStage::Choice(ChoiceStage::fetch_stage1(client).await),
            (1, None) => ActiveStage::Choice(ChoiceStage::stage1_scripted()),
            (2, Some(_)) => ActiveStage::Chat(Stage2::new()),
            (2, None) => ActiveStage::Choice(stages::stage2::scripted_choice()),
            (3, _) => ActiveStage::Absence(Stage3::new()),
            (4, Some(client)) => ActiveStage::Minutes(Stage4::fetch(client, None).await),
            (4, None) => ActiveStage::Minutes(Stage4::offline()),
            _ => ActiveStage::Done,
        };
        match &mut self.active {
            ActiveStage::Choice(s) => s.begin(&mut self.session),
            ActiveStage::Chat(s) => s.begin(&mut self.session),
            ActiveStage::Absence(s) => s.begin(&mut self.session),
            ActiveStage::Minutes(s) => s.begin(&mut self.session),
            ActiveStage::Done => {}
        }
    }
}
