//! Pangyo Survival game core.
//!
//! This crate provides:
//! - The four-stage onboarding minigame as a front-end-agnostic state machine
//! - Inventory, stage progress and their persistence
//! - The Pangyo-speak glossary, translator and magnifier tools
//! - Scripted fallbacks for every remote collaborator, so the whole game
//!   plays offline
//!
//! # Quick Start
//!
//! ```ignore
//! use pangyo_core::headless::{HeadlessConfig, HeadlessGame, StagePrompt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = HeadlessGame::new(HeadlessConfig::offline()).await?;
//!
//!     while game.prompt() != StagePrompt::Finished {
//!         for turn in game.drain_new_lines() {
//!             println!("{}", turn.text);
//!         }
//!         match game.prompt() {
//!             StagePrompt::Choices(_) => game.choose(1).await?,
//!             StagePrompt::FreeText => game.say("...").await?,
//!             StagePrompt::Finished => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod dialogue;
pub mod dictionary;
pub mod headless;
pub mod items;
pub mod magnifier;
pub mod persist;
pub mod progress;
pub mod session;
pub mod stages;
pub mod testing;
pub mod translator;

// Re-export for convenience
pub use pangyo_api::Direction;

// Primary public API
pub use dialogue::{DialogueLog, DialogueTurn, Sender};
pub use dictionary::{Dictionary, DictionaryEntry, ALL_CATEGORIES};
pub use headless::{HeadlessConfig, HeadlessGame, StagePrompt};
pub use items::{Inventory, InventoryItem};
pub use progress::{StageProgress, STAGE_COUNT};
pub use session::{GameSession, MediaOutcome, SessionError, SessionState, StageToken};
pub use stages::{
    ChatOutcome, ChoiceOutcome, ChoiceStage, EvalOutcome, EvalPolicy, Stage2, Stage3, Stage4,
    StagePhase,
};
pub use testing::{MockCollaborator, TestHarness};
pub use translator::{TranslateError, Translator};
