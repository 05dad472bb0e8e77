//! Stage 1: the first-day multiple-choice scene.
//!
//! [`ChoiceStage`] is the whole multiple-choice machine; stage 2's static
//! variant reuses it with different material (see `stage2::scripted_choice`).
//! The scenario is either the built-in script or fetched from the
//! dialogue-generation collaborator, falling back to the script on any
//! transport or schema failure.

use super::StagePhase;
use crate::dialogue::{DialogueTurn, Sender};
use crate::items::{stage_reward, InventoryItem};
use crate::session::GameSession;
use pangyo_api::{ChoiceScenario, PangyoClient, SpeakerLine};

/// Result of answering a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Right answer; reward granted, advance signalled.
    Correct,
    /// Wrong answer; choices re-presented, unlimited retries.
    Incorrect,
    /// Not accepting input right now (already answered, bad index).
    Rejected,
}

/// The material a choice scene runs on.
#[derive(Debug, Clone)]
pub struct ChoiceSpec {
    /// NPC lines that set the scene.
    pub intro: Vec<String>,
    /// Prior dialogue replayed before the prompt (remote scenarios).
    pub dialogue_before: Vec<SpeakerLine>,
    /// The options shown to the player.
    pub choices: Vec<String>,
    /// Index of the correct option.
    pub correct_index: usize,
    /// NPC lines after a correct answer (verdict and explanation).
    pub success_lines: Vec<String>,
    /// Dialogue replayed after the scene resolves (remote scenarios).
    pub dialogue_after: Vec<SpeakerLine>,
    /// NPC lines after a wrong answer, ending with the retry prompt.
    pub retry_lines: Vec<String>,
    /// The NPC line that announces the move to the next stage.
    pub advance_line: String,
}

/// A multiple-choice stage controller.
pub struct ChoiceStage {
    spec: ChoiceSpec,
    reward: InventoryItem,
    phase: StagePhase,
    started: bool,
}

impl ChoiceStage {
    pub fn new(spec: ChoiceSpec, reward: InventoryItem) -> Self {
        Self {
            spec,
            reward,
            phase: StagePhase::Intro,
            started: false,
        }
    }

    /// The built-in stage 1 scene.
    pub fn stage1_scripted() -> Self {
        let spec = ChoiceSpec {
            intro: vec![
                "안녕하세요! 오늘 첫 출근이시네요. 환영합니다! 👋".to_string(),
                "아, 그리고 오늘 오후 2시에 팀 미팅이 있는데요,\n참석 가능하신가요?".to_string(),
            ],
            dialogue_before: Vec::new(),
            choices: vec![
                "네, 참석하겠습니다!".to_string(),
                "그럼 인비(Invitation) 보내주세요~".to_string(),
                "2시요? 알겠습니다.".to_string(),
            ],
            correct_index: 1,
            success_lines: vec![
                "오! 벌써 판교어를 알고 계시네요! 😊\n\"인비(Invitation)\"는 회의 초대를 의미합니다.\n방금 캘린더에 인비 보내드렸어요!".to_string(),
                "첫 출근부터 훌륭하세요!\n이 판교어 기초 단어 사전을 드릴게요. 📚".to_string(),
            ],
            dialogue_after: Vec::new(),
            retry_lines: vec![
                "음... 회의에 참석하려면 캘린더 초대가 필요해요.\n판교에서는 \"인비(Invitation)\"라고 부른답니다! 😅".to_string(),
                "다시 한번 선택해보세요!".to_string(),
            ],
            advance_line: "다음 단계로 넘어가볼까요?".to_string(),
        };
        let reward = stage_reward(1).expect("stage 1 reward defined").clone();
        Self::new(spec, reward)
    }

    /// Build a stage 1 scene from a generated scenario.
    pub fn from_scenario(scenario: ChoiceScenario, reward: InventoryItem) -> Self {
        let mut intro = Vec::new();
        if !scenario.context.is_empty() {
            intro.push(scenario.context);
        }

        let mut success_lines = Vec::new();
        if !scenario.explanation.is_empty() {
            success_lines.push(scenario.explanation);
        }
        success_lines.push(format!("잘하셨어요!\n\"{}\"를 드릴게요!", reward.name));

        let spec = ChoiceSpec {
            intro,
            dialogue_before: scenario.dialogue_before,
            choices: scenario.choices,
            correct_index: scenario.correct_choice_index,
            success_lines,
            dialogue_after: scenario.dialogue_after,
            retry_lines: vec![
                "음... 그건 판교식 표현이 아니에요. 😅".to_string(),
                "다시 한번 선택해보세요!".to_string(),
            ],
            advance_line: "다음 단계로 넘어가볼까요?".to_string(),
        };
        Self::new(spec, reward)
    }

    /// Fetch a generated stage 1 scene, falling back to the script on any
    /// failure.
    pub async fn fetch_stage1(client: &PangyoClient) -> Self {
        let reward = stage_reward(1).expect("stage 1 reward defined").clone();
        match client.generate_choices().await {
            Ok(scenario) if !scenario.choices.is_empty() => {
                Self::from_scenario(scenario, reward)
            }
            Ok(_) => {
                tracing::warn!("choice scenario had no choices, using script");
                Self::stage1_scripted()
            }
            Err(e) => {
                tracing::warn!(error = %e, "choice generation failed, using script");
                Self::stage1_scripted()
            }
        }
    }

    /// Deliver the intro and present the choices. Idempotent: a re-entered
    /// stage view does not replay the intro.
    pub fn begin(&mut self, session: &mut GameSession) {
        if self.started {
            return;
        }
        self.started = true;

        for line in &self.spec.intro {
            session.say_npc(line.clone());
        }
        for line in &self.spec.dialogue_before {
            session.push_dialogue(DialogueTurn::new(
                Sender::from_speaker(&line.speaker),
                line.text.clone(),
            ));
        }
        self.phase = StagePhase::Presenting;
    }

    pub fn choices(&self) -> &[String] {
        &self.spec.choices
    }

    /// Answer with the given option index.
    pub fn choose(&mut self, session: &mut GameSession, index: usize) -> ChoiceOutcome {
        if self.phase != StagePhase::Presenting || index >= self.spec.choices.len() {
            return ChoiceOutcome::Rejected;
        }

        session.say_user(self.spec.choices[index].clone());
        self.phase = StagePhase::Evaluating;

        if index == self.spec.correct_index {
            for line in &self.spec.success_lines {
                session.say_npc(line.clone());
            }
            for line in &self.spec.dialogue_after {
                session.push_dialogue(DialogueTurn::new(
                    Sender::from_speaker(&line.speaker),
                    line.text.clone(),
                ));
            }
            session.award_item(&self.reward);
            session.say_npc(self.spec.advance_line.clone());
            session.go_to_next_stage();
            self.phase = StagePhase::Completed;
            ChoiceOutcome::Correct
        } else {
            for line in &self.spec.retry_lines {
                session.say_npc(line.clone());
            }
            self.phase = StagePhase::Presenting;
            ChoiceOutcome::Incorrect
        }
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == StagePhase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::DICTIONARY_ID;
    use crate::session::MediaOutcome;

    fn session() -> GameSession {
        let mut s = GameSession::in_memory();
        s.start_game();
        s.complete_start_video(MediaOutcome::Finished);
        s
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut session = session();
        let mut stage = ChoiceStage::stage1_scripted();

        stage.begin(&mut session);
        let len = session.dialogue().len();
        stage.begin(&mut session);
        assert_eq!(session.dialogue().len(), len);
        assert_eq!(stage.phase(), StagePhase::Presenting);
    }

    #[test]
    fn test_correct_choice_grants_dictionary_and_advances() {
        let mut session = session();
        let mut stage = ChoiceStage::stage1_scripted();
        stage.begin(&mut session);

        assert_eq!(stage.choose(&mut session, 1), ChoiceOutcome::Correct);
        assert!(stage.is_complete());
        assert!(session.inventory().has(DICTIONARY_ID));
        assert_eq!(session.inventory().len(), 1);
        assert!(session.is_transitioning());
        // Progress only updates when the transition settles.
        assert!(!session.progress().is_complete(1));
    }

    #[test]
    fn test_incorrect_choice_represents_without_progress() {
        let mut session = session();
        let mut stage = ChoiceStage::stage1_scripted();
        stage.begin(&mut session);

        assert_eq!(stage.choose(&mut session, 0), ChoiceOutcome::Incorrect);
        assert_eq!(stage.phase(), StagePhase::Presenting);
        assert!(session.inventory().is_empty());
        assert!(session.progress().is_empty());
        assert!(!session.is_transitioning());

        // Unlimited retries: wrong again, then right.
        assert_eq!(stage.choose(&mut session, 2), ChoiceOutcome::Incorrect);
        assert_eq!(stage.choose(&mut session, 1), ChoiceOutcome::Correct);
    }

    #[test]
    fn test_choose_guards() {
        let mut session = session();
        let mut stage = ChoiceStage::stage1_scripted();
        stage.begin(&mut session);

        assert_eq!(stage.choose(&mut session, 9), ChoiceOutcome::Rejected);

        stage.choose(&mut session, 1);
        // Already completed; further answers rejected.
        assert_eq!(stage.choose(&mut session, 1), ChoiceOutcome::Rejected);
    }

    #[test]
    fn test_from_scenario_replays_dialogue() {
        let mut session = session();
        let scenario = ChoiceScenario {
            context: "점심시간, 탕비실 앞.".to_string(),
            dialogue_before: vec![SpeakerLine::new("employee_a", "이따 싱크 한번 맞출까요?")],
            choices: vec!["좋아요".to_string(), "네, 인비 주세요".to_string()],
            correct_choice_index: 1,
            explanation: "싱크 전에 인비부터!".to_string(),
            dialogue_after: vec![SpeakerLine::new("employee_b", "바로 보내드릴게요.")],
            used_terms: vec!["싱크".to_string(), "인비".to_string()],
        };
        let reward = stage_reward(1).unwrap().clone();
        let mut stage = ChoiceStage::from_scenario(scenario, reward);

        stage.begin(&mut session);
        let senders: Vec<Sender> = session.dialogue().turns().iter().map(|t| t.sender).collect();
        assert_eq!(senders, vec![Sender::Npc, Sender::EmployeeA]);

        assert_eq!(stage.choose(&mut session, 1), ChoiceOutcome::Correct);
        assert!(session
            .dialogue()
            .turns()
            .iter()
            .any(|t| t.sender == Sender::EmployeeB));
    }
}
