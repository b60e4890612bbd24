pub(crate) mod anthropic;
pub(crate) mod openai;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::transcript::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com",
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to {provider} failed")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: Provider,
        status: StatusCode,
        body: String,
    },

    #[error("{0} returned an empty reply")]
    EmptyReply(Provider),
}

/// One call to the model: the instruction envelope, the conversation so far
/// and, for structured output, the JSON schema the reply must follow.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system: &'a str,
    pub turns: &'a [Turn],
    pub output_schema: Option<&'a serde_json::Value>,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<String, ModelError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Builds the HTTP-backed model for `provider`.
pub fn connect(
    provider: Provider,
    api_key: String,
    settings: ModelSettings,
) -> reqwest::Result<Box<dyn ChatModel>> {
    Ok(match provider {
        Provider::OpenAi => Box::new(openai::OpenAi::new(api_key, settings)?),
        Provider::Anthropic => Box::new(anthropic::Anthropic::new(api_key, settings)?),
    })
}

fn http_client(settings: &ModelSettings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(settings.timeout).build()
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ModelError::Api {
        provider,
        status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_names_parse_from_cli() {
        assert_eq!(Provider::from_str("openai").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::from_str("anthropic").unwrap(), Provider::Anthropic);
        assert!(Provider::from_str("gemini").is_err());
        assert_eq!(Provider::OpenAi.to_string(), "openai");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:8080/", "v1/messages"),
            "http://localhost:8080/v1/messages"
        );
        assert_eq!(
            endpoint("https://api.openai.com/v1", "chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
