use std::env;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuizGenerationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct QuizGenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl QuizGenerationConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STUDY_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("STUDY_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("STUDY_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Free-form quiz text returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedQuiz {
    pub quiz: String,
}

/// Turns study notes into multiple-choice questions through an
/// OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct QuizGenerationService {
    client: Client,
    config: Option<QuizGenerationConfig>,
}

impl QuizGenerationService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuizGenerationConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<QuizGenerationConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate five questions from `text`.
    ///
    /// # Errors
    ///
    /// Returns `QuizGenerationError::MissingText` for blank notes and
    /// `QuizGenerationError::Disabled` without an API key, both before any
    /// request is made. Remote failures map to `HttpStatus`,
    /// `InvalidResponse`, `EmptyResponse` or `Http`.
    pub async fn generate(&self, text: &str) -> Result<GeneratedQuiz, QuizGenerationError> {
        if text.trim().is_empty() {
            return Err(QuizGenerationError::MissingText);
        }
        let config = self
            .config
            .as_ref()
            .ok_or(QuizGenerationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(text),
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        tracing::info!(%status, model = %config.model, "quiz generation responded");

        parse_completion(status, &raw)
    }
}

/// The instruction sent to the model, followed by the notes.
#[must_use]
pub fn build_prompt(notes: &str) -> String {
    format!(
        "\nCreate 5 multiple-choice questions from the following notes.\n\
         Each question should have:\n\
         - Question\n\
         - A) B) C) D)\n\
         - Correct answer: (A/B/C/D)\n\
         \n\
         Notes:\n\
         {notes}\n"
    )
}

/// Interprets a chat completion response body.
///
/// Any JSON body is accepted. An unsuccessful status is reported with the
/// server's `error.message` when present, whatever else the body holds.
///
/// # Errors
///
/// Returns `InvalidResponse` for non-JSON bodies, `HttpStatus` for
/// unsuccessful statuses and `EmptyResponse` when no content came back.
pub fn parse_completion(status: StatusCode, raw: &str) -> Result<GeneratedQuiz, QuizGenerationError> {
    let body: Value =
        serde_json::from_str(raw).map_err(|_| QuizGenerationError::InvalidResponse {
            raw: raw.to_owned(),
        })?;

    if !status.is_success() {
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_owned();
        return Err(QuizGenerationError::HttpStatus { status, message });
    }

    serde_json::from_value::<ChatResponse>(body)
        .ok()
        .and_then(|body| body.choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .map(|quiz| GeneratedQuiz { quiz })
        .ok_or(QuizGenerationError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> QuizGenerationService {
        QuizGenerationService::new(Some(QuizGenerationConfig {
            // Nothing listens here; tests below must fail before sending.
            base_url: "http://127.0.0.1:9".into(),
            api_key: "test-key".into(),
            model: DEFAULT_MODEL.into(),
        }))
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_any_request() {
        let err = configured().generate("  \n ").await.unwrap_err();
        assert!(matches!(err, QuizGenerationError::MissingText));
    }

    #[tokio::test]
    async fn missing_key_disables_generation() {
        let svc = QuizGenerationService::new(None);
        assert!(!svc.enabled());
        let err = svc.generate("supply and demand").await.unwrap_err();
        assert!(matches!(err, QuizGenerationError::Disabled));
    }

    #[test]
    fn prompt_embeds_notes_after_instructions() {
        let prompt = build_prompt("Tariffs raise domestic prices.");
        assert!(prompt.contains("Create 5 multiple-choice questions from the following notes."));
        assert!(prompt.contains("- Correct answer: (A/B/C/D)"));
        assert!(prompt.ends_with("Notes:\nTariffs raise domestic prices.\n"));
    }

    #[test]
    fn successful_completion_yields_quiz_text() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"1. What is a tariff?"}}]}"#;
        let quiz = parse_completion(StatusCode::OK, raw).unwrap();
        assert_eq!(quiz.quiz, "1. What is a tariff?");
    }

    #[test]
    fn error_status_carries_server_message() {
        let raw = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        match parse_completion(StatusCode::UNAUTHORIZED, raw).unwrap_err() {
            QuizGenerationError::HttpStatus { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_message_uses_fallback() {
        let err = parse_completion(StatusCode::BAD_GATEWAY, "{}").unwrap_err();
        assert!(matches!(
            err,
            QuizGenerationError::HttpStatus { ref message, .. } if message == "request failed"
        ));
    }

    #[test]
    fn error_status_with_unexpected_shape_keeps_the_status() {
        let raw = r#"{"error":"upstream down"}"#;
        match parse_completion(StatusCode::BAD_GATEWAY, raw).unwrap_err() {
            QuizGenerationError::HttpStatus { status, message } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(message, "request failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unexpected_success_shape_is_empty_response() {
        let raw = r#"{"choices":"not a list"}"#;
        assert!(matches!(
            parse_completion(StatusCode::OK, raw).unwrap_err(),
            QuizGenerationError::EmptyResponse
        ));
    }

    #[test]
    fn non_json_body_is_invalid() {
        let err = parse_completion(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(
            err,
            QuizGenerationError::InvalidResponse { ref raw } if raw == "<html>oops</html>"
        ));
    }

    #[test]
    fn missing_content_is_empty_response() {
        let raw = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(matches!(
            parse_completion(StatusCode::OK, raw).unwrap_err(),
            QuizGenerationError::EmptyResponse
        ));
        assert!(matches!(
            parse_completion(StatusCode::OK, r#"{"choices":[]}"#).unwrap_err(),
            QuizGenerationError::EmptyResponse
        ));
    }
}
