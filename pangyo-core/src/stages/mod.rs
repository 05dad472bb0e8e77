//! The four stage controllers.
//!
//! Each stage is a small state machine over the shared [`StagePhase`]:
//! `Intro -> (Loading) -> Presenting -> Evaluating -> {Retry -> Presenting |
//! Rewarding -> Completed}`. Controllers are synchronous; collaborator
//! traffic is split into a request-building half and a reply-applying half so
//! tests can drive them without I/O. The scripted delays of the original
//! presentation collapse to immediate sequencing - ordering is what matters:
//! context, prior dialogue replay, prompt, verdict, explanation, reward,
//! advance.

pub mod stage1;
pub mod stage2;
pub mod stage3;
pub mod stage4;

pub use stage1::{ChoiceOutcome, ChoiceStage};
pub use stage2::{ChatOutcome, Stage2};
pub use stage3::{evaluate_absence_message, AbsenceCheck, Stage3, Stage3Outcome};
pub use stage4::{scripted_meeting, EvalOutcome, EvalPolicy, Stage4, SubmitAction};

/// Where a stage controller currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// Created, intro not yet delivered.
    Intro,
    /// Waiting on a remote generation call.
    Loading,
    /// Waiting for player input.
    Presenting,
    /// A submission is being judged (possibly remotely).
    Evaluating,
    /// Passed; reward granted and advance signalled.
    Completed,
}
