use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::parse::{self, OutputShape};
use crate::runner::{excerpt, CommandRunner};

/// Maximum number of stderr characters carried into failure diagnostics.
pub(crate) const ERROR_EXCERPT_CHARS: usize = 500;

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Normalized answer from a CLI tool. Failures are `None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub content: String,
}

/// External CLI tool families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Codex,
    Claude,
    Gemini,
    Grok,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Codex,
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::Grok,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LlmError::UnknownProvider(s.to_string()))
    }
}

/// Invalid-argument conditions, raised before any subprocess is spawned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("messages must contain at least one item")]
    EmptyMessages,
    #[error("last message must contain non-empty 'content'")]
    EmptyPrompt,
    #[error("model identifier must be 'provider:model', got: {0}")]
    MalformedModel(String),
    #[error("unknown provider in model identifier: {0}")]
    UnknownProvider(String),
}

/// One CLI tool family: how to invoke it and how to read what it prints.
#[async_trait]
pub trait CliAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Binary name or path of the external tool.
    fn program(&self) -> &str;

    /// Argument vector for the tool, excluding the program itself.
    fn build_args(&self, model: &str, prompt: &str) -> Vec<String>;

    fn shape(&self) -> OutputShape;

    fn runner(&self) -> &dyn CommandRunner;

    /// Turn captured stdout into plain text. Never fails.
    fn parse_output(&self, stdout: &str) -> String {
        parse::extract_content(self.shape(), stdout)
    }

    /// Run the tool once and normalize its output. `None` on non-zero exit or timeout.
    async fn query(&self, model: &str, prompt: &str, timeout: Duration) -> Option<QueryResponse> {
        let args = self.build_args(model, prompt);
        let output = self.runner().run(self.program(), &args, timeout).await;

        if !output.is_success() {
            warn!(
                provider = %self.kind(),
                model = model,
                exit_code = output.exit_code,
                error = excerpt(&output.stderr, ERROR_EXCERPT_CHARS),
                "CLI query failed"
            );
            return None;
        }

        Some(QueryResponse {
            content: self.parse_output(&output.stdout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_round_trips_through_str() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
        }
    }

    #[test]
    fn every_provider_has_a_configured_tool() {
        assert_eq!(
            ProviderKind::ALL.map(ProviderKind::as_str),
            council_core::config::PROVIDER_NAMES
        );
        let tools = council_core::ToolPaths::default();
        for kind in ProviderKind::ALL {
            assert!(tools.for_provider(kind.as_str()).is_some(), "{kind}");
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert_eq!(
            "foo".parse::<ProviderKind>(),
            Err(LlmError::UnknownProvider("foo".into()))
        );
        // Prefix matching is exact and case-sensitive.
        assert!("Codex".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn message_serializes_with_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
