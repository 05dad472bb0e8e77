//! Minimal client for the Pangyo Survival backend services.
//!
//! This crate provides a focused HTTP client for the four external
//! collaborators the game talks to:
//! - Choice-scenario generation (stage 1)
//! - Multi-turn conversation (stage 2)
//! - Meeting generation and minutes evaluation (stage 4)
//! - Pangyo-speak translation (the translator tool)
//!
//! Every endpoint has an explicit request/response schema; anything the
//! server omits falls back to a default rather than failing the whole
//! response.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the Pangyo services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Pangyo services client.
#[derive(Clone)]
pub struct PangyoClient {
    client: reqwest::Client,
    base_url: String,
}

impl PangyoClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: trim_trailing_slash(base_url.into()),
        }
    }

    /// Create a client from the `PANGYO_API_URL` environment variable,
    /// falling back to the default local address.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PANGYO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a multiple-choice scenario for stage 1.
    pub async fn generate_choices(&self) -> Result<ChoiceScenario, Error> {
        self.post_json("/stage1/choices", &serde_json::json!({})).await
    }

    /// Exchange one turn with the stage 2 conversational collaborator.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, Error> {
        self.post_json("/stage2/chat", request).await
    }

    /// Generate a meeting transcript for stage 4.
    pub async fn generate_meeting(&self, request: &MeetingRequest) -> Result<MeetingScript, Error> {
        self.post_json("/stage4/meeting", request).await
    }

    /// Submit meeting minutes for evaluation.
    pub async fn evaluate_minutes(
        &self,
        request: &EvaluateRequest,
    ) -> Result<MinutesEvaluation, Error> {
        self.post_json("/stage4/evaluate", request).await
    }

    /// Translate a sentence in the given direction.
    ///
    /// Plain language goes to `/translate` (with a `top_k` hint), Pangyo-speak
    /// goes to `/to-normal`.
    pub async fn translate(&self, sentence: &str, direction: Direction) -> Result<String, Error> {
        let response: TranslateResponse = match direction {
            Direction::ToPangyo => {
                self.post_json(
                    "/translate",
                    &serde_json::json!({ "sentence": sentence, "top_k": 10 }),
                )
                .await?
            }
            Direction::ToPlain => {
                self.post_json("/to-normal", &serde_json::json!({ "sentence": sentence }))
                    .await?
            }
        };
        Ok(response.translated)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .headers(json_headers())
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: extract_error_detail(&body, status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

fn classify_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(e.to_string())
    }
}

/// Pull the `detail` field out of an error body if the server sent one.
fn extract_error_detail(body: &str, status: u16) -> String {
    #[derive(Deserialize)]
    struct Detail {
        detail: String,
    }

    match serde_json::from_str::<Detail>(body) {
        Ok(d) if !d.detail.is_empty() => d.detail,
        _ if !body.is_empty() => body.to_string(),
        _ => format!("request failed with status {status}"),
    }
}

// ============================================================================
// Request/response schemas
// ============================================================================

/// Translation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plain language to Pangyo-speak.
    ToPangyo,
    /// Pangyo-speak to plain language.
    ToPlain,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated: String,
}

/// One line of scripted dialogue with a named speaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerLine {
    pub speaker: String,
    pub text: String,
}

impl SpeakerLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// A generated multiple-choice scenario (stage 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceScenario {
    /// Scene-setting text shown before the dialogue.
    #[serde(default)]
    pub context: String,

    /// NPC dialogue leading up to the choice.
    #[serde(default)]
    pub dialogue_before: Vec<SpeakerLine>,

    /// The options presented to the player.
    pub choices: Vec<String>,

    /// Index into `choices` of the correct answer.
    pub correct_choice_index: usize,

    /// Explanation shown after a correct answer.
    #[serde(default)]
    pub explanation: String,

    /// NPC dialogue after the choice is resolved.
    #[serde(default)]
    pub dialogue_after: Vec<SpeakerLine>,

    /// Pangyo terms the scenario exercises.
    #[serde(default)]
    pub used_terms: Vec<String>,
}

/// One message in a stage 2 conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A message from the player.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// A message from the NPC side of the conversation.
    pub fn npc(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request for one stage 2 conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
}

/// Reply from the stage 2 conversational collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// The NPC's next message.
    pub message: String,

    /// How many turns the conversation has run.
    #[serde(default)]
    pub turn_count: u32,

    /// Whether the collaborator considers the conversation over.
    #[serde(default)]
    pub is_ending: bool,

    /// On ending: whether the player handled the scenario well.
    #[serde(default)]
    pub understood: Option<bool>,
}

/// Request for a generated stage 4 meeting.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,

    pub turn_count: u32,
}

/// A generated meeting transcript (stage 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingScript {
    #[serde(default)]
    pub scenario: String,

    #[serde(default)]
    pub context: String,

    /// The meeting dialogue between the two employees.
    pub dialogue: Vec<SpeakerLine>,

    /// Points the minutes are expected to cover.
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Pangyo terms the transcript exercises.
    #[serde(default)]
    pub used_terms: Vec<String>,
}

/// Request to evaluate the player's meeting minutes.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateRequest {
    pub dialogue: Vec<SpeakerLine>,
    pub key_points: Vec<String>,
    pub user_minutes: String,
    pub used_terms: Vec<String>,
}

/// Evaluation verdict for submitted minutes.
#[derive(Debug, Clone, Deserialize)]
pub struct MinutesEvaluation {
    /// Score out of 100.
    pub score: u32,

    /// The evaluator's own pass/fail call.
    #[serde(default)]
    pub is_well_written: bool,

    #[serde(default)]
    pub feedback: String,

    #[serde(default)]
    pub missing_points: Vec<String>,

    #[serde(default)]
    pub misunderstood_terms: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}
