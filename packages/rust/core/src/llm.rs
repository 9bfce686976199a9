//! Completion service boundary.
//!
//! Every phase makes exactly one call through [`CompletionService`]: a system
//! instruction plus one user prompt in, the first choice's text out. There is
//! no retry and no client-side timeout; any failure is returned to the caller
//! and aborts the run.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use seoforge_shared::{OpenAiConfig, Result, SeoForgeError};

/// Path appended to the configured API root.
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Opaque text-completion function.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Model identifier used for every call.
    fn model(&self) -> &str;

    /// Run one completion and return the generated text verbatim.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Prompt size as logged by every phase, in characters.
pub(crate) fn prompt_chars(prompt: &str) -> usize {
    prompt.chars().count()
}

// ---------------------------------------------------------------------------
// OpenAI adapter
// ---------------------------------------------------------------------------

/// Settings for [`OpenAiCompletion`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiSettings {
    /// Combine the `[openai]` section with a resolved API key.
    pub fn from_config(config: &OpenAiConfig, api_key: String) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

/// Chat-completions client for OpenAI-compatible APIs.
pub struct OpenAiCompletion {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletion {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(SeoForgeError::config("OpenAI API key is required"));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| SeoForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}{CHAT_COMPLETIONS_PATH}",
            settings.base_url.trim_end_matches('/')
        );

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key,
            model: settings.model,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt_chars(prompt)))]
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SeoForgeError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!(%status, "completion API returned an error");
            return Err(SeoForgeError::Completion(format!(
                "HTTP {}: {message}",
                status.as_u16()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SeoForgeError::Completion(format!("malformed response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SeoForgeError::Completion("response contained no text".into()))?;

        debug!(response_chars = text.chars().count(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiCompletion {
        OpenAiCompletion::new(OpenAiSettings {
            api_key: "sk-test".into(),
            model: "gpt-4o".into(),
            base_url: format!("{}/v1/", server.uri()),
        })
        .unwrap()
    }

    #[test]
    fn prompt_size_counts_characters() {
        assert_eq!(prompt_chars("remote hiring"), 13);
        assert_eq!(prompt_chars("contratación — México"), 21);
        assert_eq!(prompt_chars(""), 0);
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = OpenAiCompletion::new(OpenAiSettings {
            api_key: " ".into(),
            model: "gpt-4o".into(),
            base_url: "https://api.openai.com/v1".into(),
        });
        assert!(matches!(result, Err(SeoForgeError::Config { .. })));
    }

    #[tokio::test]
    async fn complete_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "be an SEO expert"},
                    {"role": "user", "content": "list keywords"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "  remote hiring, offshore staffing\n"}},
                    {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = client_for(&server);
        let text = llm.complete("be an SEO expert", "list keywords").await.unwrap();
        assert_eq!(text, "  remote hiring, offshore staffing\n");
        assert_eq!(llm.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn api_error_propagates_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete("s", "p").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("Incorrect API key provided"), "{msg}");
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete("s", "p").await.unwrap_err();
        assert!(err.to_string().contains("HTTP 429: slow down"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("s", "p").await.unwrap_err();
        assert!(matches!(err, SeoForgeError::Completion(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let llm = OpenAiCompletion::new(OpenAiSettings {
            api_key: "sk-test".into(),
            model: "gpt-4o".into(),
            base_url: "http://127.0.0.1:9/v1".into(),
        })
        .unwrap();

        let err = llm.complete("s", "p").await.unwrap_err();
        assert!(err.to_string().starts_with("completion error: request failed"));
    }
}
