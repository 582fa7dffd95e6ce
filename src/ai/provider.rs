//! Provider identifiers and per-provider defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Supported AI completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Claude,
    Ollama,
}

impl Provider {
    /// The literal wire string used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Claude => "claude",
            Provider::Ollama => "ollama",
        }
    }

    /// Model used when the configuration leaves the field empty.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4",
            Provider::Claude => "claude-3-sonnet-20240229",
            Provider::Ollama => "llama2",
        }
    }

    /// Well-known endpoint used when the configuration leaves the field empty.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Claude => "https://api.anthropic.com/v1",
            Provider::Ollama => "http://localhost:11434",
        }
    }

    /// Whether the provider authenticates with an API key. Ollama runs
    /// locally and does not.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(AiError::ProviderRequired),
            "openai" => Ok(Provider::OpenAi),
            "claude" => Ok(Provider::Claude),
            "ollama" => Ok(Provider::Ollama),
            other => Err(AiError::UnsupportedProvider(other.to_string())),
        }
    }
}
