//! Supported embedding providers

use serde::{Deserialize, Serialize};

/// Supported embedding providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(dead_code)]
pub enum EmbeddingProvider {
    /// Local embedding using sentence transformers
    Local,
    /// `OpenAI`'s text embedding models
    OpenAI,
    /// Mistral AI's embedding models
    Mistral,
    /// Azure `OpenAI` Service
    AzureOpenAI,
    /// Custom provider implementation
    Custom(String),
}
