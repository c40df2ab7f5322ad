//! services/api/src/adapters/chat.rs
//!
//! The journal chat companion. `OpenAiChatAdapter` implements the
//! `ChatResponder` port against any OpenAI-compatible endpoint; `FallbackChat`
//! wraps it so that callers always get a reply, even with no upstream at all.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use mindmatters_core::ports::{ChatResponder, PortError, PortResult};
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a compassionate mental health support assistant. \
Provide empathetic, helpful responses that encourage positive mental health practices. \
Keep responses concise and supportive. If someone expresses serious mental health concerns, \
gently suggest professional help.";

const FALLBACK_REPLIES: [&str; 5] = [
    "Thank you for sharing that with me. How does writing about this make you feel?",
    "I hear you. It's important to acknowledge your feelings. What would help you feel better right now?",
    "That sounds significant. Remember that it's okay to feel whatever you're feeling. What support do you need?",
    "I appreciate you opening up. Taking time to reflect on your emotions is really valuable. How can I help?",
    "Your feelings are valid. Sometimes just expressing what we're going through can be therapeutic. What's on your mind?",
];

/// Sent when the exchange itself could not be completed.
pub const TECHNICAL_ISSUE_REPLY: &str = "I'm here to listen. Sometimes technical issues happen, \
but your feelings and thoughts are always important. How are you doing today?";

//=========================================================================================
// The Upstream Adapter
//=========================================================================================

/// An adapter that implements `ChatResponder` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ChatResponder for OpenAiChatAdapter {
    async fn respond(&self, message: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(200u32)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| PortError::Unexpected("Chat model returned no text".to_string()))
    }
}

//=========================================================================================
// Fallback Wrapper
//=========================================================================================

/// Always answers: an upstream failure degrades to a canned reply.
#[derive(Clone, Default)]
pub struct FallbackChat {
    upstream: Option<Arc<dyn ChatResponder>>,
}

impl FallbackChat {
    pub fn new(upstream: Option<Arc<dyn ChatResponder>>) -> Self {
        Self { upstream }
    }

    pub async fn reply(&self, message: &str) -> String {
        if let Some(upstream) = &self.upstream {
            match upstream.respond(message).await {
                Ok(reply) => return reply,
                Err(e) => warn!("Chat upstream unavailable, using fallback: {}", e),
            }
        }
        fallback_reply(message).to_string()
    }
}

/// Picks a canned reply by a stable hash of the message, so the same message
/// always gets the same fallback.
pub fn fallback_reply(message: &str) -> &'static str {
    let hash = message
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    FALLBACK_REPLIES[hash as usize % FALLBACK_REPLIES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(PortResult<&'static str>);

    #[async_trait]
    impl ChatResponder for Scripted {
        async fn respond(&self, _message: &str) -> PortResult<String> {
            match &self.0 {
                Ok(reply) => Ok(reply.to_string()),
                Err(_) => Err(PortError::Unexpected("upstream down".to_string())),
            }
        }
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_reply("I had a rough day");
        let b = fallback_reply("I had a rough day");
        assert_eq!(a, b);
        assert!(FALLBACK_REPLIES.contains(&a));
        assert!(FALLBACK_REPLIES.contains(&fallback_reply("")));
    }

    #[tokio::test]
    async fn upstream_reply_is_passed_through() {
        let chat = FallbackChat::new(Some(Arc::new(Scripted(Ok("Tell me more.")))));
        assert_eq!(chat.reply("hello").await, "Tell me more.");
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_fallback() {
        let chat = FallbackChat::new(Some(Arc::new(Scripted(Err(PortError::Unauthorized)))));
        assert_eq!(chat.reply("hello").await, fallback_reply("hello"));
    }

    #[tokio::test]
    async fn no_upstream_means_fallback() {
        let chat = FallbackChat::default();
        assert_eq!(chat.reply("hello").await, fallback_reply("hello"));
    }
}
