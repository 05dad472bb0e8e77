//! The Pangyo-speak translator tool.
//!
//! A thin layer over the translation endpoints that validates input and
//! turns transport failures into the user-facing messages the translator
//! panel shows.

use pangyo_api::{Direction, PangyoClient};

/// User-facing translation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslateError {
    #[error("번역할 텍스트를 입력해주세요.")]
    EmptyInput,

    #[error("번역 요청 시간이 초과되었습니다. 다시 시도해주세요.")]
    Timeout,

    #[error("서버에 연결할 수 없습니다. 네트워크 연결을 확인해주세요.")]
    Unreachable,

    #[error("{0}")]
    Service(String),
}

/// The translator panel's backend.
#[derive(Clone)]
pub struct Translator {
    client: PangyoClient,
}

impl Translator {
    pub fn new(client: PangyoClient) -> Self {
        Self { client }
    }

    /// Translate a sentence in the given direction.
    pub async fn translate(
        &self,
        sentence: &str,
        direction: Direction,
    ) -> Result<String, TranslateError> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        self.client
            .translate(sentence, direction)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, ?direction, "translation failed");
                match e {
                    pangyo_api::Error::Timeout => TranslateError::Timeout,
                    pangyo_api::Error::Network(_) => TranslateError::Unreachable,
                    pangyo_api::Error::Api { status, message } => {
                        if message.is_empty() {
                            TranslateError::Service(format!("번역 요청 실패 ({status})"))
                        } else {
                            TranslateError::Service(message)
                        }
                    }
                    pangyo_api::Error::Parse(m) | pangyo_api::Error::Config(m) => {
                        TranslateError::Service(m)
                    }
                }
            })
    }

    /// Plain language to Pangyo-speak.
    pub async fn to_pangyo(&self, sentence: &str) -> Result<String, TranslateError> {
        self.translate(sentence, Direction::ToPangyo).await
    }

    /// Pangyo-speak to plain language.
    pub async fn to_plain(&self, sentence: &str) -> Result<String, TranslateError> {
        self.translate(sentence, Direction::ToPlain).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_request() {
        // Port 9 is discard; nothing should ever be sent anyway.
        let translator = Translator::new(PangyoClient::new("http://127.0.0.1:9"));
        let err = translator.to_pangyo("   \n  ").await.unwrap_err();
        assert!(matches!(err, TranslateError::EmptyInput));
        assert_eq!(err.to_string(), "번역할 텍스트를 입력해주세요.");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TranslateError::Timeout.to_string(),
            "번역 요청 시간이 초과되었습니다. 다시 시도해주세요."
        );
        assert_eq!(
            TranslateError::Unreachable.to_string(),
            "서버에 연결할 수 없습니다. 네트워크 연결을 확인해주세요."
        );
        assert_eq!(
            TranslateError::Service("서비스 점검 중입니다.".to_string()).to_string(),
            "서비스 점검 중입니다."
        );
    }
}
