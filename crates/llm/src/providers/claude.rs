use std::sync::Arc;

use crate::parse::OutputShape;
use crate::provider::{CliAdapter, ProviderKind};
use crate::runner::CommandRunner;

/// Claude CLI in print mode with JSON output. The object schema differs across
/// CLI versions, so parsing goes through the layered object strategies.
pub struct ClaudeAdapter {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl ClaudeAdapter {
    pub fn new(program: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self { program, runner }
    }
}

impl CliAdapter for ClaudeAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn build_args(&self, model: &str, prompt: &str) -> Vec<String> {
        vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "json".to_string(),
            "--model".to_string(),
            model.to_string(),
            prompt.to_string(),
        ]
    }

    fn shape(&self) -> OutputShape {
        OutputShape::JsonObject
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}
