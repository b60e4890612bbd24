use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatModel, ModelError, ModelRequest, ModelSettings, Provider};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAi {
    client: reqwest::Client,
    api_key: String,
    settings: ModelSettings,
}

impl OpenAi {
    pub fn new(api_key: String, settings: ModelSettings) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client(&settings)?,
            api_key,
            settings,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAi {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<String, ModelError> {
        let messages = std::iter::once(ChatMessage {
            role: "system",
            content: request.system,
        })
        .chain(request.turns.iter().map(|turn| ChatMessage {
            role: turn.role.as_ref(),
            content: &turn.text,
        }))
        .collect();

        // JSON mode only guarantees an object; the schema itself is in the prompt.
        let body = ChatRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            response_format: request.output_schema.map(|_| ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(super::endpoint(&self.settings.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| ModelError::Http {
                provider: Provider::OpenAi,
                source,
            })?;

        let api_response: ChatResponse = super::check_status(Provider::OpenAi, response)
            .await?
            .json()
            .await
            .map_err(|source| ModelError::Http {
                provider: Provider::OpenAi,
                source,
            })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ModelError::EmptyReply(Provider::OpenAi))
    }
}
