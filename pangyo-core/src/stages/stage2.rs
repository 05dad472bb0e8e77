//! Stage 2: the urgent-request scene.
//!
//! The primary controller is a multi-turn free-text conversation with the
//! remote collaborator, which decides when the exchange is over and whether
//! the player handled it well. A failed ending throws the whole conversation
//! away and starts over from turn zero - no partial credit.
//!
//! [`scripted_choice`] is the offline variant of the same scene: a fixed
//! three-option choice reusing the stage 1 machinery.

use super::stage1::{ChoiceSpec, ChoiceStage};
use super::StagePhase;
use crate::items::stage_reward;
use crate::session::{GameSession, StageToken};
use pangyo_api::{ChatMessage, ChatReply, ChatRequest, PangyoClient};

/// Result of applying a collaborator reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The conversation continues.
    Reply,
    /// Ended with `understood=true`: reward granted, advance signalled.
    Understood,
    /// Ended with `understood=false`: history discarded, back to turn zero.
    Restarted,
    /// Transport or schema failure: fallback message shown, player resubmits.
    Failed,
    /// The reply arrived for a stage that is no longer active.
    Ignored,
}

/// The multi-turn chat controller.
pub struct Stage2 {
    phase: StagePhase,
    started: bool,
    token: Option<StageToken>,
    history: Vec<ChatMessage>,
    pending: bool,
    scenario_id: Option<String>,
}

impl Stage2 {
    pub fn new() -> Self {
        Self {
            phase: StagePhase::Intro,
            started: false,
            token: None,
            history: Vec::new(),
            pending: false,
            scenario_id: None,
        }
    }

    pub fn with_scenario_id(mut self, id: impl Into<String>) -> Self {
        self.scenario_id = Some(id.into());
        self
    }

    /// Deliver the intro. Idempotent.
    pub fn begin(&mut self, session: &mut GameSession) {
        if self.started {
            return;
        }
        self.started = true;
        self.token = Some(session.stage_token());

        for line in intro_lines() {
            session.say_npc(line);
            self.history.push(ChatMessage::npc(line));
        }
        self.phase = StagePhase::Presenting;
    }

    /// Accept a player message and build the collaborator request.
    ///
    /// Returns `None` while a request is outstanding, before `begin`, or for
    /// blank input - one request in flight per stage, ever.
    pub fn submit(&mut self, session: &mut GameSession, text: &str) -> Option<ChatRequest> {
        if self.pending || self.phase != StagePhase::Presenting {
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        session.say_user(text);
        self.history.push(ChatMessage::user(text));
        self.pending = true;
        self.phase = StagePhase::Evaluating;

        Some(ChatRequest {
            messages: self.history.clone(),
            scenario_id: self.scenario_id.clone(),
        })
    }

    /// Apply the collaborator's reply (or its failure).
    pub fn apply_reply(
        &mut self,
        session: &mut GameSession,
        reply: Result<ChatReply, pangyo_api::Error>,
    ) -> ChatOutcome {
        let stale = self
            .token
            .map(|t| !session.is_current(t))
            .unwrap_or(true);
        if stale {
            // The player navigated away; a late reply must not touch state.
            return ChatOutcome::Ignored;
        }
        if !self.pending {
            return ChatOutcome::Ignored;
        }
        self.pending = false;

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "stage 2 chat failed");
                // Drop the unanswered message so a resubmission is clean.
                self.history.pop();
                session.say_npc("연결이 잠시 불안정하네요. 😅\n잠시 후 다시 말씀해주세요!");
                self.phase = StagePhase::Presenting;
                return ChatOutcome::Failed;
            }
        };

        session.say_npc(reply.message.clone());
        self.history.push(ChatMessage::npc(reply.message));

        if !reply.is_ending {
            self.phase = StagePhase::Presenting;
            return ChatOutcome::Reply;
        }

        if reply.understood == Some(true) {
            session.say_npc(
                "업무 메일 작성할 때 유용한\n\"판교어 번역기\"를 드릴게요! 📧",
            );
            let reward = stage_reward(2).expect("stage 2 reward defined");
            session.award_item(reward);
            session.say_npc("다음 단계로 이동할게요!");
            session.go_to_next_stage();
            self.phase = StagePhase::Completed;
            ChatOutcome::Understood
        } else {
            // No partial credit: wipe the exchange and start over.
            self.history.clear();
            session.say_npc(
                "음... 이번 대응은 조금 아쉬웠어요. 😅\n처음부터 다시 이야기해볼까요?",
            );
            for line in intro_lines() {
                session.say_npc(line);
                self.history.push(ChatMessage::npc(line));
            }
            self.phase = StagePhase::Presenting;
            ChatOutcome::Restarted
        }
    }

    /// Submit a message and exchange one turn with the collaborator.
    pub async fn exchange(
        &mut self,
        session: &mut GameSession,
        client: &PangyoClient,
        text: &str,
    ) -> ChatOutcome {
        let Some(request) = self.submit(session, text) else {
            return ChatOutcome::Ignored;
        };
        let reply = client.chat(&request).await;
        self.apply_reply(session, reply)
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == StagePhase::Completed
    }

    /// Number of messages in the collaborator-facing transcript.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for Stage2 {
    fn default() -> Self {
        Self::new()
    }
}

fn intro_lines() -> [&'static str; 2] {
    [
        "저기요~ 갑자기 급한 업무가 생겼는데요,\n이거 좀 도와주실 수 있나요? 🙏",
        "지금 하던 업무도 있으실 텐데...\n어떻게 대응하시겠어요?",
    ]
}

/// The offline stage 2 scene: the original fixed three-option choice.
pub fn scripted_choice() -> ChoiceStage {
    let spec = ChoiceSpec {
        intro: intro_lines().iter().map(|s| s.to_string()).collect(),
        dialogue_before: Vec::new(),
        choices: vec![
            "죄송하지만 지금 급한 일이 있어서 나중에 할게요.".to_string(),
            "현재 리소스가 풀이라 다른 업무는 내일 시작 가능할 것 같아요. 이 아이디어를 디벨롭해서 팀에 공유드릴게요!".to_string(),
            "네, 바로 하겠습니다!".to_string(),
        ],
        correct_index: 1,
        success_lines: vec![
            "완벽해요! 👏\n리소스(Resource)와 풀(Full)을 적절히 사용하셨네요!\n업무 우선순위를 명확히 하고, 소통하는 것이 중요합니다.".to_string(),
            "판교어 키워드도 잘 활용하셨어요:\n- 리소스: 자원, 인력\n- 풀: 가득 찬 상태\n- 디벨롭: 발전시키다\n- 공유: 정보를 나누다".to_string(),
            "업무 메일 작성할 때 유용한\n\"판교어 번역기\"를 드릴게요! 📧".to_string(),
        ],
        dialogue_after: Vec::new(),
        retry_lines: vec![
            "음... 판교에서는 좀 더 구체적으로\n상황을 설명하는 게 좋아요! 😅".to_string(),
            "힌트: \"리소스\", \"풀\", \"디벨롭\", \"공유\" 같은\n판교어를 사용해보세요!".to_string(),
            "다시 선택해주세요!".to_string(),
        ],
        advance_line: "다음 단계로 이동할게요!".to_string(),
    };
    let reward = stage_reward(2).expect("stage 2 reward defined").clone();
    ChoiceStage::new(spec, reward)
}
