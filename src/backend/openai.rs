//! OpenAI-compatible chat completion backend.

use crate::{
    config::CompletionConfig,
    core::{
        completion::CompletionBackend,
        message::{Author, EMBED_COLOUR, EmbedPayload, ReplyPayload},
        reply_chain::strip_mentions,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest reply Discord accepts as plain message content.
const MESSAGE_LIMIT: usize = 2000;
/// Longest embed description Discord accepts.
const EMBED_DESCRIPTION_LIMIT: usize = 4096;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// [`CompletionBackend`] talking to `{base_url}/chat/completions`.
pub struct OpenAiBackend {
    auth_header: String,
    endpoint: String,
    config: CompletionConfig,
    client: Client,
}

impl OpenAiBackend {
    /// Creates a backend authenticating with `api_key`.
    pub fn new(api_key: &str, config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            auth_header: format!("Bearer {api_key}"),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            config,
            client,
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str, user: &'a Author) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            user: &user.id,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    #[instrument(skip(self, content, user), fields(user = %user.id, model = %self.config.model))]
    async fn complete(&self, content: &str, user: &Author) -> Result<ReplyPayload> {
        let prompt = strip_mentions(content);
        let prompt = prompt.trim();
        let request = self.build_request(prompt, user);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion {
                message: format!("{status}: {body}"),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let text = first_choice_text(chat)?;
        debug!("Completion returned {} characters", text.chars().count());
        Ok(payload_for(text))
    }
}

fn first_choice_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::Completion {
            message: "response contained no text".to_string(),
        })
}

/// Short answers go out as plain text, long ones as an embed.
fn payload_for(text: String) -> ReplyPayload {
    if text.chars().count() <= MESSAGE_LIMIT {
        return ReplyPayload::Text(text);
    }

    let description = text.chars().take(EMBED_DESCRIPTION_LIMIT).collect();
    ReplyPayload::Embed(EmbedPayload {
        colour: EMBED_COLOUR,
        description: Some(description),
        ..EmbedPayload::default()
    })
}
