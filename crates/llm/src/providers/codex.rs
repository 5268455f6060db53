use std::sync::Arc;

use crate::parse::OutputShape;
use crate::provider::{CliAdapter, ProviderKind};
use crate::runner::CommandRunner;

/// Codex CLI: `codex exec <prompt> -m <model> --json`, JSON-lines events on stdout.
pub struct CodexAdapter {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl CodexAdapter {
    pub fn new(program: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self { program, runner }
    }
}

impl CliAdapter for CodexAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Codex
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn build_args(&self, model: &str, prompt: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            prompt.to_string(),
            "-m".to_string(),
            model.to_string(),
            "--json".to_string(),
        ]
    }

    fn shape(&self) -> OutputShape {
        OutputShape::JsonLines
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}
