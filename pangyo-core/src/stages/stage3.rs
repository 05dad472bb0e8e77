//! Stage 3: the out-of-office message.
//!
//! The player composes a leave notice; a local heuristic scores it. Passing
//! needs a minimum length and three of the four content requirements. A
//! failed attempt keeps the draft so the form comes back pre-filled with
//! itemized feedback.

use super::StagePhase;
use crate::items::stage_reward;
use crate::session::GameSession;
use regex_lite::Regex;

/// Minimum message length in characters.
pub const MIN_LENGTH: usize = 80;

/// How many of the four content requirements must be present.
pub const REQUIRED_MENTIONS: usize = 3;

/// Result of a stage 3 submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage3Outcome {
    /// Reward granted, advance signalled.
    Passed,
    /// Missing requirements, form re-presented with the draft kept.
    Failed(Vec<&'static str>),
    /// Not accepting input right now.
    Rejected,
}

/// What the heuristic found in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsenceCheck {
    pub long_enough: bool,
    pub has_date: bool,
    pub has_backup: bool,
    pub has_contact: bool,
    pub has_leave: bool,
}

impl AbsenceCheck {
    pub fn mention_count(&self) -> usize {
        [self.has_date, self.has_backup, self.has_contact, self.has_leave]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    pub fn passes(&self) -> bool {
        self.long_enough && self.mention_count() >= REQUIRED_MENTIONS
    }

    /// Labels for everything the draft is missing, length first.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.long_enough {
            missing.push("내용을 조금 더 자세히 (80자 이상)");
        }
        if !self.has_date {
            missing.push("휴가 날짜");
        }
        if !self.has_backup {
            missing.push("백업 담당자");
        }
        if !self.has_contact {
            missing.push("연락 방법 (슬랙 등)");
        }
        if !self.has_leave {
            missing.push("휴가(오프)라는 안내");
        }
        missing
    }
}

lazy_static::lazy_static! {
    // "8월 14일", "14일까지", "8/14" and the like.
    static ref DATE_PATTERN: Regex =
        Regex::new(r"[0-9]+\s*월|[0-9]+\s*일|[0-9]{1,2}\s*/\s*[0-9]{1,2}")
            .expect("date pattern compiles");
}

/// Score an out-of-office draft.
pub fn evaluate_absence_message(text: &str) -> AbsenceCheck {
    let contains_any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    AbsenceCheck {
        long_enough: text.chars().count() >= MIN_LENGTH,
        has_date: DATE_PATTERN.is_match(text),
        has_backup: contains_any(&["백업", "인수인계"]),
        has_contact: contains_any(&["슬랙", "연락", "메일", "이메일"]),
        has_leave: contains_any(&["휴가", "오프", "부재"]),
    }
}

/// The out-of-office composition controller.
pub struct Stage3 {
    phase: StagePhase,
    started: bool,
    draft: String,
}

impl Stage3 {
    pub fn new() -> Self {
        Self {
            phase: StagePhase::Intro,
            started: false,
            draft: String::new(),
        }
    }

    /// Deliver the intro and present the form. Idempotent.
    pub fn begin(&mut self, session: &mut GameSession) {
        if self.started {
            return;
        }
        self.started = true;

        session.say_npc("프로젝트가 드디어 끝났네요! 수고하셨습니다! 🎉");
        session.say_npc(
            "이제 휴가(오프)를 가실 수 있을 것 같은데요,\n휴가 전에 팀원들에게 부재중 메일을 보내주세요!",
        );
        session.say_npc(
            "필수 포함 사항:\n- 휴가 날짜\n- 백업 담당자\n- 연락 방법 (슬랙 등)",
        );
        self.phase = StagePhase::Presenting;
    }

    /// The prior draft, used to pre-fill the form after a failure.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Submit a composed message.
    pub fn submit(&mut self, session: &mut GameSession, text: &str) -> Stage3Outcome {
        if self.phase != StagePhase::Presenting || text.trim().is_empty() {
            return Stage3Outcome::Rejected;
        }

        session.say_user(format!("[메일 작성]\n\n{text}"));
        self.phase = StagePhase::Evaluating;

        let check = evaluate_absence_message(text);
        if check.passes() {
            session.say_npc("완벽한 부재중 메일이네요! 👍\n모든 필수 요소가 포함되어 있습니다!");
            session.say_npc(
                "이제 판교어 돋보기를 드릴게요! 🔍\n마우스를 올리면 판교어 뜻을 알려줍니다!",
            );
            let reward = stage_reward(3).expect("stage 3 reward defined");
            session.award_item(reward);
            session.say_npc("마지막 단계로 이동합니다!");
            session.go_to_next_stage();
            self.draft.clear();
            self.phase = StagePhase::Completed;
            Stage3Outcome::Passed
        } else {
            let missing = check.missing();
            let listed = missing
                .iter()
                .map(|m| format!("- {m}"))
                .collect::<Vec<_>>()
                .join("\n");
            session.say_npc(format!(
                "음... 필수 요소가 빠졌네요! 😅\n다음 내용을 보완해주세요:\n{listed}"
            ));
            session.say_npc("다시 작성해주세요!");
            // Keep the draft so the form comes back pre-filled.
            self.draft = text.to_string();
            self.phase = StagePhase::Presenting;
            Stage3Outcome::Failed(missing)
        }
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == StagePhase::Completed
    }
}

impl Default for Stage3 {
    fn default() -> Self {
        Self::new()
    }
}
