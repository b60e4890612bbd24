use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{ModelSettings, Provider};

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Deserialize, Debug)]
pub struct Environment {
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

impl Environment {
    pub fn api_key(&self, provider: Provider) -> Result<String> {
        let (key, variable) = match provider {
            Provider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            Provider::Anthropic => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
        };

        match key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_owned()),
            _ => bail!("{variable} must be set to use the {provider} provider"),
        }
    }
}

/// Optional settings file; every key may be left out.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub max_turns: Option<usize>,
}

impl SettingsFile {
    /// Reads `path` if given, else the per-user config file if it exists.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => match default_path().filter(|path| path.is_file()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn default_path() -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join(env!("CARGO_PKG_NAME"))
            .join("config.toml"),
    )
}

/// Values given on the command line; these win over the settings file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub max_turns: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: ModelSettings,
    pub max_turns: Option<usize>,
}

pub fn resolve(provider: Provider, file: SettingsFile, overrides: Overrides) -> Settings {
    Settings {
        model: ModelSettings {
            model: overrides
                .model
                .or(file.model)
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url: file
                .base_url
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            max_tokens: overrides
                .max_tokens
                .or(file.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: overrides
                .temperature
                .or(file.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        },
        max_turns: overrides.max_turns.or(file.max_turns),
    }
}
