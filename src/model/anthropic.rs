use async_trait::async_trait;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{ChatModel, ModelError, ModelRequest, ModelSettings, Provider};

/// Sent in place of a blank turn; the messages API rejects empty content.
const BLANK_TURN: &str = "(no answer)";

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    text: String,
}

pub struct Anthropic {
    client: reqwest::Client,
    api_key: String,
    settings: ModelSettings,
}

impl Anthropic {
    pub fn new(api_key: String, settings: ModelSettings) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client(&settings)?,
            api_key,
            settings,
        })
    }
}

#[async_trait]
impl ChatModel for Anthropic {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<String, ModelError> {
        // The messages API has no JSON mode; the schema travels in the prompt.
        let body = AnthropicRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: request.system,
            messages: request
                .turns
                .iter()
                .map(|turn| Message {
                    role: turn.role.as_ref(),
                    content: if turn.text.trim().is_empty() {
                        BLANK_TURN
                    } else {
                        turn.text.as_str()
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(super::endpoint(&self.settings.base_url, "v1/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|source| ModelError::Http {
                provider: Provider::Anthropic,
                source,
            })?;

        let api_response: AnthropicResponse = super::check_status(Provider::Anthropic, response)
            .await?
            .json()
            .await
            .map_err(|source| ModelError::Http {
                provider: Provider::Anthropic,
                source,
            })?;

        let text = api_response
            .content
            .iter()
            .map(|content| content.text.as_str())
            .join("");

        if text.trim().is_empty() {
            return Err(ModelError::EmptyReply(Provider::Anthropic));
        }

        Ok(text)
    }
}
