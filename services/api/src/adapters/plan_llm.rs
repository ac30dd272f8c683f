//! services/api/src/adapters/plan_llm.rs
//!
//! This module contains the adapter for the lesson-plan generation LLM.
//! It implements the `PlanGenerator` port from the `core` crate against any
//! OpenAI-compatible chat completion endpoint (Gemini by default).

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use lesson_planner_core::{
    domain::FinalPrompt,
    ports::{GenerationError, PlanGenerator},
};
use std::time::Duration;
use tracing::{info, warn};

//=========================================================================================
// Settings
//=========================================================================================

/// Everything the adapter needs to reach the model. Built from `Config` at startup.
#[derive(Clone, Debug)]
pub struct GenerationSettings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PlanGenerator` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiPlanAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiPlanAdapter {
    /// Creates a new `OpenAiPlanAdapter`.
    ///
    /// Each `generate` call makes exactly one HTTP request: the client's
    /// built-in backoff would otherwise resend rate-limited and 5xx requests.
    pub fn new(settings: GenerationSettings) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(settings.api_key)
            .with_api_base(settings.api_base);
        Self {
            client: Client::with_config(openai_config).with_backoff(single_attempt()),
            model: settings.model,
        }
    }
}

/// A backoff policy whose retry window is already closed.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

//=========================================================================================
// `PlanGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl PlanGenerator for OpenAiPlanAdapter {
    /// Sends the whole prompt as a single user message and returns the first choice.
    async fn generate(&self, prompt: &FinalPrompt) -> Result<String, GenerationError> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(|e| GenerationError::Service(e.to_string()))?
            .into();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .build()
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        info!(
            model = %self.model,
            prompt_chars = prompt.as_str().chars().count(),
            "Requesting lesson plan"
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| {
                let err = classify_error(e);
                warn!(
                    model = %self.model,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Lesson plan generation failed"
                );
                err
            })?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(GenerationError::MalformedResponse(
                "Generation LLM returned no choices in its response.".to_string(),
            ));
        };
        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(GenerationError::MalformedResponse(
                "Generation LLM response contained no text content.".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Maps a client error onto the port's failure variants.
fn classify_error(error: OpenAIError) -> GenerationError {
    match error {
        OpenAIError::Reqwest(e) => GenerationError::Network(e.to_string()),
        OpenAIError::ApiError(api) => classify_api_error(api),
        e @ OpenAIError::JSONDeserialize(..) => GenerationError::MalformedResponse(e.to_string()),
        other => GenerationError::Service(other.to_string()),
    }
}

fn classify_api_error(api: ApiError) -> GenerationError {
    classify_api_failure(api.message, api.r#type.as_deref(), api.code.as_deref())
}

/// Sorts an API error by its `type` and `code` markers.
fn classify_api_failure(message: String, kind: Option<&str>, code: Option<&str>) -> GenerationError {
    let markers = [kind, code];
    let has_marker = |needles: &[&str]| {
        markers
            .iter()
            .flatten()
            .any(|marker| needles.iter().any(|needle| marker.eq_ignore_ascii_case(needle)))
    };

    if has_marker(&[
        "invalid_api_key",
        "authentication_error",
        "permission_denied",
        "unauthenticated",
    ]) {
        GenerationError::Authentication(message)
    } else if has_marker(&[
        "insufficient_quota",
        "rate_limit_exceeded",
        "rate_limit_error",
        "resource_exhausted",
        // Gemini's compatibility layer reports throttling with a null type and this code.
        "429",
    ]) {
        GenerationError::Quota(message)
    } else {
        GenerationError::Service(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_planner_core::{build_prompt, AuxiliaryInfo, LectureText, TemplateChoice};
    use serde_json::json;
    use tokio::time::timeout;

    /// Generous bound: a retrying client would sit in backoff far longer.
    const ONE_ATTEMPT_BUDGET: Duration = Duration::from_secs(10);

    fn adapter_for(base: &str) -> OpenAiPlanAdapter {
        OpenAiPlanAdapter::new(GenerationSettings {
            api_key: "test-key".to_string(),
            api_base: base.to_string(),
            model: "gemini-1.5-flash".to_string(),
        })
    }

    fn sample_prompt() -> FinalPrompt {
        build_prompt(
            TemplateChoice::TheoryTeaching,
            &AuxiliaryInfo {
                course_name: "数据结构".to_string(),
                class_name: "软件2301".to_string(),
                course_date: "2024-05-01".to_string(),
            },
            &LectureText::from("本课介绍栈与队列。"),
        )
    }

    fn completion_body(content: serde_json::Value) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1714521600,
            "model": "gemini-1.5-flash",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
        .to_string()
    }

    fn api_error_body(message: &str, kind: &str, code: &str) -> String {
        json!({
            "error": { "message": message, "type": kind, "param": null, "code": code }
        })
        .to_string()
    }

    #[tokio::test]
    async fn returns_the_first_choice_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(json!("一、教学目标……")))
            .create_async()
            .await;

        let plan = adapter_for(&server.url())
            .generate(&sample_prompt())
            .await
            .unwrap();

        assert_eq!(plan, "一、教学目标……");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_key_is_an_authentication_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(api_error_body(
                "Incorrect API key provided",
                "invalid_request_error",
                "invalid_api_key",
            ))
            .create_async()
            .await;

        let err = adapter_for(&server.url())
            .generate(&sample_prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Authentication(ref m) if m.contains("Incorrect API key")));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn exhausted_quota_is_a_quota_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(api_error_body(
                "You exceeded your current quota",
                "insufficient_quota",
                "insufficient_quota",
            ))
            .create_async()
            .await;

        let err = adapter_for(&server.url())
            .generate(&sample_prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Quota(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn server_errors_fail_after_one_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = timeout(
            ONE_ATTEMPT_BUDGET,
            adapter_for(&server.url()).generate(&sample_prompt()),
        )
        .await
        .expect("a server error must not be retried")
        .unwrap_err();

        assert!(matches!(err, GenerationError::Service(ref m) if m.contains("overloaded")));
        assert!(err.is_retryable());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_rate_limit_is_a_quota_failure_after_one_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": {
                        "message": "Resource has been exhausted (e.g. check quota).",
                        "type": null,
                        "param": null,
                        "code": "429"
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let err = timeout(
            ONE_ATTEMPT_BUDGET,
            adapter_for(&server.url()).generate(&sample_prompt()),
        )
        .await
        .expect("a rate-limited request must not be retried")
        .unwrap_err();

        assert!(matches!(err, GenerationError::Quota(ref m) if m.contains("exhausted")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn undecodable_body_is_a_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>gateway page</html>")
            .create_async()
            .await;

        let err = adapter_for(&server.url())
            .generate(&sample_prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_content_is_a_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(serde_json::Value::Null))
            .create_async()
            .await;

        let err = adapter_for(&server.url())
            .generate(&sample_prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_failure() {
        // Nothing listens on port 9 (discard) on a test machine.
        let err = adapter_for("http://127.0.0.1:9")
            .generate(&sample_prompt())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn unknown_api_errors_are_service_failures() {
        let err = classify_api_failure(
            "The model is overloaded".to_string(),
            Some("server_error"),
            None,
        );
        assert!(matches!(err, GenerationError::Service(_)));

        let err = classify_api_failure(
            "API key not valid".to_string(),
            None,
            Some("PERMISSION_DENIED"),
        );
        assert!(matches!(err, GenerationError::Authentication(_)));
    }
}
