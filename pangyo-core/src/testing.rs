//! Testing utilities for the game core.
//!
//! This module provides tools for integration testing:
//! - `MockCollaborator` for deterministic stage tests without API calls
//! - `TestHarness` for scripted playthroughs
//! - Assertion helpers for verifying session state

use crate::session::{GameSession, MediaOutcome};
use crate::stages::{ChatOutcome, EvalOutcome, Stage2, Stage4, SubmitAction};
use pangyo_api::{ChatReply, MinutesEvaluation};
use std::collections::VecDeque;

/// A scripted stand-in for the remote collaborators.
///
/// Replies are served in queue order; an exhausted queue serves a neutral
/// default so tests never hang on missing material.
#[derive(Default)]
pub struct MockCollaborator {
    chat_replies: VecDeque<ChatReply>,
    evaluations: VecDeque<MinutesEvaluation>,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a mid-conversation chat reply.
    pub fn queue_reply(&mut self, message: impl Into<String>) -> &mut Self {
        self.chat_replies.push_back(chat_reply(message, false, None));
        self
    }

    /// Queue a conversation-ending chat reply.
    pub fn queue_ending(&mut self, message: impl Into<String>, understood: bool) -> &mut Self {
        self.chat_replies
            .push_back(chat_reply(message, true, Some(understood)));
        self
    }

    /// Queue a minutes evaluation with the given score.
    pub fn queue_evaluation(&mut self, score: u32, feedback: impl Into<String>) -> &mut Self {
        self.evaluations.push_back(evaluation(score, feedback));
        self
    }

    /// Next chat reply, or a neutral non-ending default.
    pub fn next_chat_reply(&mut self) -> ChatReply {
        self.chat_replies
            .pop_front()
            .unwrap_or_else(|| chat_reply("네, 계속 말씀해주세요.", false, None))
    }

    /// Next evaluation, or a passing default.
    pub fn next_evaluation(&mut self) -> MinutesEvaluation {
        self.evaluations
            .pop_front()
            .unwrap_or_else(|| evaluation(100, "좋아요!"))
    }
}

fn chat_reply(message: impl Into<String>, is_ending: bool, understood: Option<bool>) -> ChatReply {
    serde_json::from_value(serde_json::json!({
        "message": message.into(),
        "turn_count": 0,
        "is_ending": is_ending,
        "understood": understood,
    }))
    .expect("chat reply literal")
}

fn evaluation(score: u32, feedback: impl Into<String>) -> MinutesEvaluation {
    serde_json::from_value(serde_json::json!({
        "score": score,
        "is_well_written": score >= crate::stages::stage4::PASS_THRESHOLD,
        "feedback": feedback.into(),
        "missing_points": [],
        "misunderstood_terms": [],
        "suggestions": [],
    }))
    .expect("evaluation literal")
}

/// Test harness for running playthroughs against scripted collaborators.
pub struct TestHarness {
    /// The session under test, already started.
    pub session: GameSession,
    /// The scripted collaborator.
    pub collaborator: MockCollaborator,
}

impl TestHarness {
    /// An in-memory session with the intro already dismissed.
    pub fn new() -> Self {
        let mut session = GameSession::in_memory();
        session.start_game();
        session.complete_start_video(MediaOutcome::Finished);
        Self {
            session,
            collaborator: MockCollaborator::new(),
        }
    }

    /// Settle the pending stage transition.
    pub fn settle_transition(&mut self) {
        self.session.complete_transition(MediaOutcome::Finished);
    }

    /// Drive one stage 2 turn through the mock collaborator.
    pub fn chat_turn(&mut self, stage: &mut Stage2, text: &str) -> ChatOutcome {
        match stage.submit(&mut self.session, text) {
            Some(_request) => {
                let reply = self.collaborator.next_chat_reply();
                stage.apply_reply(&mut self.session, Ok(reply))
            }
            None => ChatOutcome::Ignored,
        }
    }

    /// Drive one stage 4 submission through the mock collaborator.
    pub fn submit_minutes(&mut self, stage: &mut Stage4, minutes: &str) -> EvalOutcome {
        match stage.submit(&mut self.session, minutes) {
            SubmitAction::Completed => EvalOutcome::Passed,
            SubmitAction::Rejected => EvalOutcome::Ignored,
            SubmitAction::Evaluate(_request) => {
                let verdict = self.collaborator.next_evaluation();
                stage.apply_evaluation(&mut self.session, Ok(verdict))
            }
        }
    }

    /// The text of the last dialogue turn.
    pub fn last_line(&self) -> Option<&str> {
        self.session.dialogue().last().map(|t| t.text.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session is on the given stage.
#[track_caller]
pub fn assert_stage(harness: &TestHarness, stage: u8) {
    assert_eq!(
        harness.session.current_stage(),
        stage,
        "Expected to be on stage {stage}, got {}",
        harness.session.current_stage()
    );
}

/// Assert the inventory contains an item with the given id.
#[track_caller]
pub fn assert_has_item(harness: &TestHarness, id: &str) {
    assert!(
        harness.session.inventory().has(id),
        "Expected item '{id}' in inventory"
    );
}

/// Assert the inventory does NOT contain an item with the given id.
#[track_caller]
pub fn assert_no_item(harness: &TestHarness, id: &str) {
    assert!(
        !harness.session.inventory().has(id),
        "Expected item '{id}' to NOT be in inventory"
    );
}

/// Assert a stage has been recorded as completed.
#[track_caller]
pub fn assert_stage_complete(harness: &TestHarness, stage: u8) {
    assert!(
        harness.session.progress().is_complete(stage),
        "Expected stage {stage} to be recorded as completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{DICTIONARY_ID, EMAIL_HELPER_ID};
    use crate::stages::{ChoiceOutcome, ChoiceStage};

    #[test]
    fn test_mock_collaborator_queue_order_and_default() {
        let mut mock = MockCollaborator::new();
        mock.queue_reply("첫번째").queue_ending("마지막", true);

        assert_eq!(mock.next_chat_reply().message, "첫번째");
        let ending = mock.next_chat_reply();
        assert!(ending.is_ending);
        assert_eq!(ending.understood, Some(true));

        // Exhausted queue serves a non-ending default.
        assert!(!mock.next_chat_reply().is_ending);
    }

    #[test]
    fn test_harness_stage1_flow() {
        let mut harness = TestHarness::new();
        let mut stage = ChoiceStage::stage1_scripted();
        stage.begin(&mut harness.session);

        assert_eq!(
            stage.choose(&mut harness.session, 1),
            ChoiceOutcome::Correct
        );
        assert_has_item(&harness, DICTIONARY_ID);
        harness.settle_transition();
        assert_stage(&harness, 2);
        assert_stage_complete(&harness, 1);
    }

    #[test]
    fn test_harness_chat_turns() {
        let mut harness = TestHarness::new();
        harness.session.go_to_next_stage();
        harness.settle_transition();
        let mut stage = Stage2::new();
        stage.begin(&mut harness.session);

        harness.collaborator.queue_reply("언제 가능하세요?");
        harness.collaborator.queue_ending("좋아요, 그렇게 하죠!", true);

        assert_eq!(
            harness.chat_turn(&mut stage, "지금은 리소스가 풀이에요."),
            ChatOutcome::Reply
        );
        assert_eq!(
            harness.chat_turn(&mut stage, "내일 오전에 공유드릴게요."),
            ChatOutcome::Understood
        );
        assert_has_item(&harness, EMAIL_HELPER_ID);
    }
}
