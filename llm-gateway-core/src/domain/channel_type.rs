use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream provider a channel talks to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// OpenAI and OpenAI-compatible endpoints
    #[default]
    OpenAI,
    Azure,
    Anthropic,
    Gemini,
    /// Regional deployments; regions live in the channel's `other` field
    VertexAI,
    Bedrock,
    Cohere,
    DeepSeek,
    Ollama,
    Custom,
}

impl ChannelType {
    pub const ALL: [ChannelType; 10] = [
        ChannelType::OpenAI,
        ChannelType::Azure,
        ChannelType::Anthropic,
        ChannelType::Gemini,
        ChannelType::VertexAI,
        ChannelType::Bedrock,
        ChannelType::Cohere,
        ChannelType::DeepSeek,
        ChannelType::Ollama,
        ChannelType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::OpenAI => "openai",
            ChannelType::Azure => "azure",
            ChannelType::Anthropic => "anthropic",
            ChannelType::Gemini => "gemini",
            ChannelType::VertexAI => "vertexai",
            ChannelType::Bedrock => "bedrock",
            ChannelType::Cohere => "cohere",
            ChannelType::DeepSeek => "deepseek",
            ChannelType::Ollama => "ollama",
            ChannelType::Custom => "custom",
        }
    }

    /// Regional channels encode several deployments in `other` instead of
    /// carrying several keys.
    pub fn is_regional(&self) -> bool {
        matches!(self, ChannelType::VertexAI)
    }

    pub fn supports_model_discovery(&self) -> bool {
        matches!(self, ChannelType::OpenAI)
    }

    /// Endpoint used when a channel has no base URL of its own.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ChannelType::OpenAI => Some("https://api.openai.com"),
            ChannelType::Anthropic => Some("https://api.anthropic.com"),
            ChannelType::Gemini => Some("https://generativelanguage.googleapis.com"),
            ChannelType::Cohere => Some("https://api.cohere.ai"),
            ChannelType::DeepSeek => Some("https://api.deepseek.com"),
            ChannelType::Ollama => Some("http://localhost:11434"),
            ChannelType::Azure | ChannelType::VertexAI | ChannelType::Bedrock | ChannelType::Custom => None,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown channel type: {}", s))
    }
}
