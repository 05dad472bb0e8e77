//! Stage 4: the meeting-minutes finale.
//!
//! The player reads a meeting transcript and writes minutes. Under
//! [`EvalPolicy::Remote`] the minutes go to the evaluation collaborator and
//! pass at [`PASS_THRESHOLD`] or above; under [`EvalPolicy::AlwaysPass`] any
//! non-blank submission wins, which is also the offline fallback. Passing
//! grants the welcome kit and ends the game.

use super::StagePhase;
use crate::dialogue::{DialogueTurn, Sender};
use crate::items::stage_reward;
use crate::session::{GameSession, StageToken};
use pangyo_api::{
    EvaluateRequest, MeetingRequest, MeetingScript, MinutesEvaluation, PangyoClient, SpeakerLine,
};

/// Minimum score out of 100 that passes under [`EvalPolicy::Remote`].
pub const PASS_THRESHOLD: u32 = 70;

/// How submitted minutes are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalPolicy {
    /// Any non-blank submission passes. The offline policy.
    AlwaysPass,
    /// The evaluation collaborator scores the minutes.
    Remote,
}

/// What to do with a submission.
#[derive(Debug, Clone)]
pub enum SubmitAction {
    /// Send this to the evaluation collaborator, then call
    /// [`Stage4::apply_evaluation`].
    Evaluate(EvaluateRequest),
    /// The stage resolved locally (always-pass policy).
    Completed,
    /// Not accepting input right now.
    Rejected,
}

/// Result of applying an evaluation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Reward granted, game finished.
    Passed,
    /// Below threshold; feedback shown, form re-presented with the draft kept.
    Failed,
    /// Transport or schema failure; fallback message shown, player resubmits.
    Errored,
    /// The verdict arrived for a stage that is no longer active.
    Ignored,
}

/// The meeting-minutes controller.
pub struct Stage4 {
    script: MeetingScript,
    policy: EvalPolicy,
    phase: StagePhase,
    started: bool,
    token: Option<StageToken>,
    pending: bool,
    draft: String,
}

impl Stage4 {
    pub fn new(script: MeetingScript, policy: EvalPolicy) -> Self {
        Self {
            script,
            policy,
            phase: StagePhase::Intro,
            started: false,
            token: None,
            pending: false,
            draft: String::new(),
        }
    }

    /// The built-in offline finale: scripted meeting, any submission passes.
    pub fn offline() -> Self {
        Self::new(scripted_meeting(), EvalPolicy::AlwaysPass)
    }

    /// Fetch a generated meeting, falling back to the script on any failure.
    /// The fallback keeps the remote evaluation policy.
    pub async fn fetch(client: &PangyoClient, scenario_id: Option<String>) -> Self {
        let request = MeetingRequest {
            scenario_id,
            turn_count: 8,
        };
        match client.generate_meeting(&request).await {
            Ok(script) if !script.dialogue.is_empty() => Self::new(script, EvalPolicy::Remote),
            Ok(_) => {
                tracing::warn!("generated meeting had no dialogue, using script");
                Self::new(scripted_meeting(), EvalPolicy::Remote)
            }
            Err(e) => {
                tracing::warn!(error = %e, "meeting generation failed, using script");
                Self::new(scripted_meeting(), EvalPolicy::Remote)
            }
        }
    }

    /// Deliver the intro, replay the meeting transcript, and present the
    /// minutes form. Idempotent.
    pub fn begin(&mut self, session: &mut GameSession) {
        if self.started {
            return;
        }
        self.started = true;
        self.token = Some(session.stage_token());

        session.say_npc("휴가 잘 다녀오셨나요? 😊");
        if !self.script.context.is_empty() {
            session.say_npc(self.script.context.clone());
        }
        session.say_npc(
            "마지막 미션이에요!\n방금 끝난 회의 내용을 듣고 회의록을 작성해주세요. 📝",
        );
        for line in &self.script.dialogue {
            session.push_dialogue(DialogueTurn::new(
                Sender::from_speaker(&line.speaker),
                line.text.clone(),
            ));
        }
        session.say_npc(
            "회의 내용을 정리해서 회의록을 작성해주세요!\n핵심 결정 사항을 빠뜨리지 않는 게 중요해요.",
        );
        self.phase = StagePhase::Presenting;
    }

    /// The meeting transcript.
    pub fn dialogue(&self) -> &[SpeakerLine] {
        &self.script.dialogue
    }

    /// The prior draft, used to pre-fill the form after a failure.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn policy(&self) -> EvalPolicy {
        self.policy
    }

    /// Submit minutes. Under the remote policy this returns the evaluation
    /// request to send; one request in flight at a time.
    pub fn submit(&mut self, session: &mut GameSession, minutes: &str) -> SubmitAction {
        if self.pending || self.phase != StagePhase::Presenting || minutes.trim().is_empty() {
            return SubmitAction::Rejected;
        }

        session.say_user(format!("[회의록 작성]\n\n{minutes}"));
        self.phase = StagePhase::Evaluating;

        match self.policy {
            EvalPolicy::AlwaysPass => {
                self.finish(session, "훌륭한 회의록이네요! 👏\n핵심을 잘 정리하는 자세가 멋져요!");
                SubmitAction::Completed
            }
            EvalPolicy::Remote => {
                self.draft = minutes.to_string();
                self.pending = true;
                SubmitAction::Evaluate(EvaluateRequest {
                    dialogue: self.script.dialogue.clone(),
                    key_points: self.script.key_points.clone(),
                    user_minutes: minutes.to_string(),
                    used_terms: self.script.used_terms.clone(),
                })
            }
        }
    }

    /// Apply the collaborator's verdict (or its failure).
    pub fn apply_evaluation(
        &mut self,
        session: &mut GameSession,
        verdict: Result<MinutesEvaluation, pangyo_api::Error>,
    ) -> EvalOutcome {
        let stale = self.token.map(|t| !session.is_current(t)).unwrap_or(true);
        if stale {
            return EvalOutcome::Ignored;
        }
        if !self.pending {
            return EvalOutcome::Ignored;
        }
        self.pending = false;

        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(error = %e, "minutes evaluation failed");
                session.say_npc(
                    "평가 서버와 연결이 잠시 끊겼어요. 😅\n잠시 후 다시 제출해주세요!",
                );
                self.phase = StagePhase::Presenting;
                return EvalOutcome::Errored;
            }
        };

        if verdict.score >= PASS_THRESHOLD {
            let feedback = if verdict.feedback.is_empty() {
                "훌륭한 회의록이네요! 👏".to_string()
            } else {
                verdict.feedback
            };
            self.finish(session, format!("{feedback}\n(점수: {}점)", verdict.score));
            EvalOutcome::Passed
        } else {
            session.say_npc(format!(
                "음... 조금 아쉬워요! (점수: {}점)\n{}",
                verdict.score, verdict.feedback
            ));
            if !verdict.missing_points.is_empty() {
                let listed = verdict
                    .missing_points
                    .iter()
                    .map(|p| format!("- {p}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                session.say_npc(format!("빠진 내용:\n{listed}"));
            }
            if !verdict.suggestions.is_empty() {
                let listed = verdict
                    .suggestions
                    .iter()
                    .map(|s| format!("- {s}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                session.say_npc(format!("이렇게 보완해보세요:\n{listed}"));
            }
            session.say_npc("다시 작성해주세요!");
            self.phase = StagePhase::Presenting;
            EvalOutcome::Failed
        }
    }

    /// Submit minutes and, if needed, round-trip the evaluation.
    pub async fn exchange(
        &mut self,
        session: &mut GameSession,
        client: &PangyoClient,
        minutes: &str,
    ) -> EvalOutcome {
        match self.submit(session, minutes) {
            SubmitAction::Completed => EvalOutcome::Passed,
            SubmitAction::Rejected => EvalOutcome::Ignored,
            SubmitAction::Evaluate(request) => {
                let verdict = client.evaluate_minutes(&request).await;
                self.apply_evaluation(session, verdict)
            }
        }
    }

    fn finish(&mut self, session: &mut GameSession, verdict_line: impl Into<String>) {
        session.say_npc(verdict_line.into());
        session.say_npc(
            "지금까지 정말 수고 많으셨습니다!\n판교 생존의 모든 단계를 완료하셨어요! 🎉",
        );
        session.say_npc("축하드립니다! 🎁\n\"판교 생존 웰컴 키트\"를 드릴게요!");
        let reward = stage_reward(4).expect("stage 4 reward defined");
        session.award_item(reward);
        session.finish_game();
        self.draft.clear();
        self.phase = StagePhase::Completed;
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == StagePhase::Completed
    }
}

/// The built-in meeting transcript.
pub fn scripted_meeting() -> MeetingScript {
    MeetingScript {
        scenario: "sprint-kickoff".to_string(),
        context: "오전 10시, 스프린트 킥오프 회의실.".to_string(),
        dialogue: vec![
            SpeakerLine::new(
                "employee_a",
                "이번 스프린트에서 신규 기능 먼저 어사인할게요.\n리소스 상황부터 싱크 맞춰볼까요?",
            ),
            SpeakerLine::new(
                "employee_b",
                "저는 이번 주까지 리소스가 풀이에요.\n다음 주 월요일부터 착수 가능합니다.",
            ),
            SpeakerLine::new(
                "employee_a",
                "좋아요, 그럼 착수는 다음 주 월요일로 컨펌할게요.\n디자인 시안은 이번 주 금요일까지 공유 부탁드려요.",
            ),
            SpeakerLine::new(
                "employee_b",
                "네, 금요일까지 공유드리고\n리뷰 결과는 슬랙으로 팔로업하겠습니다.",
            ),
        ],
        key_points: vec![
            "신규 기능 착수는 다음 주 월요일로 확정".to_string(),
            "디자인 시안은 금요일까지 공유".to_string(),
            "리뷰 팔로업은 슬랙으로 진행".to_string(),
        ],
        used_terms: vec![
            "어사인".to_string(),
            "리소스".to_string(),
            "싱크".to_string(),
            "컨펌".to_string(),
            "공유".to_string(),
            "팔로업".to_string(),
        ],
    }
}
