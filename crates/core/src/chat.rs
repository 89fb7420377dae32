//! Chat assistant.
//!
//! Forwards a user's message to a generative-language provider and falls back to canned keyword
//! scripts whenever the provider is missing, fails, times out or answers with empty text. There
//! is exactly one provider attempt per message.

use crate::constants::FALLBACK_NOTE;
use crate::fallback::fallback_reply;
use crate::{SymptomError, SymptomResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_PROMPT_REPLY: &str = "Please enter a message to get started. I can help you understand symptoms and provide general medical information.";
const PROVIDER_TEST_PROMPT: &str = "Say 'Hello, I am your medical AI assistant!'";

/// Sampling parameters passed to the provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 500,
        }
    }
}

/// Capability interface for a text-generation provider.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> SymptomResult<String>;

    /// Models usable for text generation.
    async fn list_models(&self) -> SymptomResult<Vec<String>>;
}

/// Where a chat reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSource {
    Ai,
    Fallback,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub source: ChatSource,
    pub timestamp: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Result of probing the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCheck {
    pub ok: bool,
    pub message: String,
    pub test_response: Option<String>,
    pub available_models: Vec<String>,
}

#[derive(Clone)]
pub struct ChatAssistant {
    generator: Option<Arc<dyn Generator>>,
    config: GenerationConfig,
    timeout: Duration,
}

impl ChatAssistant {
    /// Creates an assistant. `None` means no provider is configured and every reply is a
    /// fallback script.
    pub fn new(generator: Option<Arc<dyn Generator>>, timeout: Duration) -> Self {
        Self {
            generator,
            config: GenerationConfig::default(),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Answers a chat message. Never fails: provider trouble is logged and replaced by a
    /// fallback script.
    pub async fn reply(&self, message: &str) -> ChatReply {
        if message.trim().is_empty() {
            return ChatReply {
                response: SYSTEM_PROMPT_REPLY.into(),
                source: ChatSource::System,
                timestamp: None,
                note: None,
            };
        }

        if let Some(generator) = &self.generator {
            match self.generate_bounded(generator.as_ref(), message).await {
                Ok(text) => {
                    return ChatReply {
                        response: text,
                        source: ChatSource::Ai,
                        timestamp: Some(Utc::now()),
                        note: None,
                    }
                }
                Err(e) => tracing::warn!("falling back to canned reply: {e}"),
            }
        }

        ChatReply {
            response: fallback_reply(message).into(),
            source: ChatSource::Fallback,
            timestamp: Some(Utc::now()),
            note: Some(FALLBACK_NOTE.into()),
        }
    }

    async fn generate_bounded(
        &self,
        generator: &dyn Generator,
        message: &str,
    ) -> SymptomResult<String> {
        let prompt = doctor_prompt(message);
        let text = tokio::time::timeout(self.timeout, generator.generate(&prompt, &self.config))
            .await
            .map_err(|_| {
                SymptomError::UpstreamUnavailable(format!(
                    "no response within {}s",
                    self.timeout.as_secs()
                ))
            })??;

        if text.trim().is_empty() {
            return Err(SymptomError::UpstreamUnavailable(
                "provider returned empty text".into(),
            ));
        }
        Ok(text)
    }

    /// Probes the provider: lists its models, then runs a fixed test prompt.
    pub async fn provider_check(&self) -> ProviderCheck {
        let Some(generator) = &self.generator else {
            return ProviderCheck {
                ok: false,
                message: "No API key configured".into(),
                test_response: None,
                available_models: Vec::new(),
            };
        };

        let available_models =
            match tokio::time::timeout(self.timeout, generator.list_models()).await {
                Ok(Ok(models)) => models,
                Ok(Err(e)) => vec![format!("Error listing models: {e}")],
                Err(_) => vec!["Error listing models: timed out".to_string()],
            };

        let test =
            tokio::time::timeout(self.timeout, generator.generate(PROVIDER_TEST_PROMPT, &self.config))
                .await;
        match test {
            Ok(Ok(text)) => ProviderCheck {
                ok: true,
                message: "AI provider is working".into(),
                test_response: Some(text),
                available_models,
            },
            Ok(Err(e)) => ProviderCheck {
                ok: false,
                message: format!("AI provider test failed: {e}"),
                test_response: None,
                available_models,
            },
            Err(_) => ProviderCheck {
                ok: false,
                message: "AI provider test failed: timed out".into(),
                test_response: None,
                available_models,
            },
        }
    }
}

fn doctor_prompt(message: &str) -> String {
    format!(
        r#"You are a friendly doctor having a conversation with a patient. Respond in a warm, conversational tone like you're talking to someone in your office.

Patient says: "{message}"

Respond as a doctor would:
- Be conversational and empathetic ("I understand...", "Let me help you...")
- Give practical, immediate advice they can try
- Explain things simply without too much medical jargon
- Always recommend seeing a real doctor for proper evaluation
- Keep it concise - 3-4 short paragraphs max
- Use "**" for important points like "**Call a doctor if:**"

Talk like a caring doctor, not a formal medical textbook."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Deterministic provider for tests.
    struct MockGenerator {
        response: SymptomResult<String>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        fn answering(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(SymptomError::UpstreamUnavailable("quota exceeded".into())),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::answering("too late")
            }
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> SymptomResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(SymptomError::UpstreamUnavailable(e.to_string())),
            }
        }

        async fn list_models(&self) -> SymptomResult<Vec<String>> {
            Ok(vec!["models/mock-1".into()])
        }
    }

    fn assistant(generator: MockGenerator) -> (ChatAssistant, Arc<MockGenerator>) {
        let generator = Arc::new(generator);
        let assistant = ChatAssistant::new(
            Some(generator.clone() as Arc<dyn Generator>),
            Duration::from_millis(200),
        );
        (assistant, generator)
    }

    #[tokio::test]
    async fn blank_message_gets_system_prompt_without_calling_provider() {
        let (assistant, generator) = assistant(MockGenerator::answering("hi"));

        let reply = assistant.reply("   ").await;

        assert_eq!(reply.source, ChatSource::System);
        assert!(reply.timestamp.is_none());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_text_is_returned_as_ai() {
        let (assistant, generator) = assistant(MockGenerator::answering("Drink water."));

        let reply = assistant.reply("I have a headache").await;

        assert_eq!(reply.source, ChatSource::Ai);
        assert_eq!(reply.response, "Drink water.");
        assert!(reply.timestamp.is_some());
        assert!(reply.note.is_none());
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Patient says: \"I have a headache\""));
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_script() {
        let (assistant, _) = assistant(MockGenerator::failing());

        let reply = assistant.reply("bad cough").await;

        assert_eq!(reply.source, ChatSource::Fallback);
        assert!(reply.response.starts_with("Coughs are usually"));
        assert_eq!(reply.note.as_deref(), Some(FALLBACK_NOTE));
    }

    #[tokio::test]
    async fn empty_provider_text_falls_back() {
        let (assistant, _) = assistant(MockGenerator::answering("  "));
        let reply = assistant.reply("fever").await;
        assert_eq!(reply.source, ChatSource::Fallback);
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_fallback() {
        let (assistant, _) = assistant(MockGenerator::slow(Duration::from_secs(5)));

        let reply = assistant.reply("stomach ache").await;

        assert_eq!(reply.source, ChatSource::Fallback);
        assert!(reply.response.starts_with("Stomach troubles"));
    }

    #[tokio::test]
    async fn unconfigured_assistant_always_falls_back() {
        let assistant = ChatAssistant::new(None, Duration::from_secs(1));
        assert!(!assistant.is_configured());

        let reply = assistant.reply("hello").await;
        assert_eq!(reply.source, ChatSource::Fallback);

        let check = assistant.provider_check().await;
        assert!(!check.ok);
        assert_eq!(check.message, "No API key configured");
    }

    #[tokio::test]
    async fn provider_check_reports_models_and_test_response() {
        let (assistant, generator) = assistant(MockGenerator::answering("Hello!"));

        let check = assistant.provider_check().await;

        assert!(check.ok);
        assert_eq!(check.test_response.as_deref(), Some("Hello!"));
        assert_eq!(check.available_models, vec!["models/mock-1"]);
        assert_eq!(generator.prompts.lock().unwrap()[0], PROVIDER_TEST_PROMPT);
    }

    #[tokio::test]
    async fn provider_check_reports_failure() {
        let (assistant, _) = assistant(MockGenerator::failing());
        let check = assistant.provider_check().await;
        assert!(!check.ok);
        assert!(check.message.contains("quota exceeded"));
    }
}
