//! The Pangyo-speak glossary.
//!
//! A static table of term records with derived lookups by category and by
//! term, plus the free-text filter the dictionary viewer uses. The table
//! ships built in; `from_json_str` accepts the output of the offline
//! data-preparation step (rows with an empty term are discarded).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The category filter value that bypasses category filtering.
pub const ALL_CATEGORIES: &str = "전체";

/// One glossary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub term: String,
    pub category: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub keywords: String,
}

impl DictionaryEntry {
    pub fn new(
        term: impl Into<String>,
        category: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
        keywords: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            category: category.into(),
            definition: definition.into(),
            example: example.into(),
            keywords: keywords.into(),
        }
    }
}

/// The glossary store with derived lookup maps.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    by_term: HashMap<String, usize>,
}

impl Dictionary {
    /// Build a dictionary, discarding rows with an empty term.
    pub fn new(entries: Vec<DictionaryEntry>) -> Self {
        let entries: Vec<DictionaryEntry> = entries
            .into_iter()
            .filter(|e| !e.term.trim().is_empty())
            .collect();

        let by_term = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.term.clone(), i))
            .collect();

        Self { entries, by_term }
    }

    /// The built-in glossary.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ENTRIES.clone())
    }

    /// Load a dictionary from a prepared JSON array.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<DictionaryEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Exact term lookup.
    pub fn get(&self, term: &str) -> Option<&DictionaryEntry> {
        self.by_term.get(term).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// All categories, deduplicated and sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.entries.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Entries in one category.
    pub fn in_category(&self, category: &str) -> Vec<&DictionaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// The viewer filter: case-insensitive substring search over term,
    /// definition and keywords, intersected with an optional category.
    /// `ALL_CATEGORIES` bypasses the category filter.
    pub fn filter(&self, search: &str, category: &str) -> Vec<&DictionaryEntry> {
        let search = search.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| category == ALL_CATEGORIES || e.category == category)
            .filter(|e| {
                search.is_empty()
                    || e.term.to_lowercase().contains(&search)
                    || e.definition.to_lowercase().contains(&search)
                    || e.keywords.to_lowercase().contains(&search)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

lazy_static::lazy_static! {
    /// The built-in Pangyo-speak glossary rows.
    static ref BUILTIN_ENTRIES: Vec<DictionaryEntry> = vec![
        DictionaryEntry::new(
            "인비",
            "일정",
            "회의 초대(Invitation). 캘린더로 보내는 회의 초대장을 말한다.",
            "그럼 인비 보내주세요~",
            "invitation,초대,회의,캘린더",
        ),
        DictionaryEntry::new(
            "핑",
            "소통",
            "메신저로 짧게 연락하는 것(Ping). 확인 요청을 보낼 때 쓴다.",
            "확인되시면 핑 주세요!",
            "ping,연락,메신저",
        ),
        DictionaryEntry::new(
            "리소스",
            "업무",
            "자원, 특히 투입 가능한 인력이나 시간(Resource).",
            "지금 리소스가 부족해서 다음 주에 가능해요.",
            "resource,자원,인력",
        ),
        DictionaryEntry::new(
            "풀",
            "업무",
            "여유가 전혀 없이 가득 찬 상태(Full).",
            "이번 주는 일정이 풀이에요.",
            "full,가득,일정",
        ),
        DictionaryEntry::new(
            "디벨롭",
            "업무",
            "아이디어나 결과물을 더 발전시키는 것(Develop).",
            "이 안을 조금 더 디벨롭해볼게요.",
            "develop,발전,개선",
        ),
        DictionaryEntry::new(
            "공유",
            "소통",
            "정보를 팀에 전달하는 것. 문서나 회의로 알리는 행위 전반.",
            "정리해서 팀에 공유드릴게요.",
            "share,전달,알림",
        ),
        DictionaryEntry::new(
            "오프",
            "일정",
            "휴가(Day off). 연차나 반차로 자리를 비우는 것.",
            "다음 주 월요일 오프입니다.",
            "off,휴가,연차",
        ),
        DictionaryEntry::new(
            "백업",
            "업무",
            "부재 중 업무를 대신 맡아줄 사람이나 그 체계(Backup).",
            "휴가 동안 백업은 김 매니저님이 맡아주세요.",
            "backup,대리,부재",
        ),
        DictionaryEntry::new(
            "슬랙",
            "소통",
            "사내 메신저(Slack). 급한 연락은 대부분 슬랙으로 한다.",
            "급하면 슬랙 주세요.",
            "slack,메신저,연락",
        ),
        DictionaryEntry::new(
            "싱크",
            "소통",
            "서로의 이해를 맞추는 것(Sync). 짧은 정렬 회의를 뜻하기도 한다.",
            "내일 오전에 싱크 한번 맞춰요.",
            "sync,정렬,회의",
        ),
        DictionaryEntry::new(
            "팔로업",
            "업무",
            "논의된 일을 끝까지 챙기는 것(Follow-up).",
            "이 건은 제가 팔로업하겠습니다.",
            "follow up,후속,챙김",
        ),
        DictionaryEntry::new(
            "어사인",
            "업무",
            "업무를 담당자에게 배정하는 것(Assign).",
            "이 티켓은 저한테 어사인해주세요.",
            "assign,배정,담당",
        ),
        DictionaryEntry::new(
            "컨펌",
            "소통",
            "확정 승인(Confirm). 결정권자의 확인을 받는 것.",
            "팀장님 컨펌 받고 진행할게요.",
            "confirm,승인,확정",
        ),
        DictionaryEntry::new(
            "스프린트",
            "일정",
            "짧은 개발 주기(Sprint). 보통 1~2주 단위로 돈다.",
            "이번 스프린트에 넣기엔 일정이 빠듯해요.",
            "sprint,주기,애자일",
        ),
        DictionaryEntry::new(
            "온보딩",
            "조직",
            "새 구성원이 조직과 업무에 적응하는 과정(Onboarding).",
            "온보딩 기간에는 멘토가 붙어요.",
            "onboarding,적응,입사",
        ),
        DictionaryEntry::new(
            "회고",
            "조직",
            "한 일을 돌아보며 잘한 점과 개선점을 정리하는 자리(Retrospective).",
            "스프린트 끝나고 회고 진행할게요.",
            "retrospective,돌아보기,개선",
        ),
        DictionaryEntry::new(
            "린하게",
            "업무",
            "군더더기 없이 최소한으로(Lean). 작게 시작해서 빨리 검증하자는 뜻.",
            "일단 린하게 시작해보시죠.",
            "lean,최소,빠르게",
        ),
        DictionaryEntry::new(
            "R&R",
            "조직",
            "역할과 책임(Role and Responsibility). 누가 무엇을 맡는지의 구분.",
            "이 프로젝트 R&R부터 정리합시다.",
            "role,responsibility,역할,책임",
        ),
    ];
}
