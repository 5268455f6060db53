pub mod claude;
pub mod codex;
pub mod gemini;
pub mod grok;

use std::sync::Arc;

use council_core::ToolPaths;

use crate::provider::{CliAdapter, ProviderKind};
use crate::runner::CommandRunner;

/// Create the adapter for a provider, invoking the binary configured for it.
pub fn create_adapter(
    kind: ProviderKind,
    tools: &ToolPaths,
    runner: Arc<dyn CommandRunner>,
) -> Box<dyn CliAdapter> {
    match kind {
        ProviderKind::Codex => Box::new(codex::CodexAdapter::new(tools.codex.clone(), runner)),
        ProviderKind::Claude => Box::new(claude::ClaudeAdapter::new(tools.claude.clone(), runner)),
        ProviderKind::Gemini => Box::new(gemini::GeminiAdapter::new(tools.gemini.clone(), runner)),
        ProviderKind::Grok => Box::new(grok::GrokAdapter::new(tools.grok.clone(), runner)),
    }
}

/// One adapter per provider, looked up by exhaustive match.
pub struct AdapterSet {
    codex: Box<dyn CliAdapter>,
    claude: Box<dyn CliAdapter>,
    gemini: Box<dyn CliAdapter>,
    grok: Box<dyn CliAdapter>,
}

impl AdapterSet {
    pub fn new(tools: &ToolPaths, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            codex: create_adapter(ProviderKind::Codex, tools, runner.clone()),
            claude: create_adapter(ProviderKind::Claude, tools, runner.clone()),
            gemini: create_adapter(ProviderKind::Gemini, tools, runner.clone()),
            grok: create_adapter(ProviderKind::Grok, tools, runner),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> &dyn CliAdapter {
        match kind {
            ProviderKind::Codex => self.codex.as_ref(),
            ProviderKind::Claude => self.claude.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
            ProviderKind::Grok => self.grok.as_ref(),
        }
    }
}
