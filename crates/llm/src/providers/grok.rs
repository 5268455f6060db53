use std::sync::Arc;

use crate::parse::OutputShape;
use crate::provider::{CliAdapter, ProviderKind};
use crate::runner::CommandRunner;

/// Grok one-shot CLI. Credentials come from the tool's own environment/config.
pub struct GrokAdapter {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl GrokAdapter {
    pub fn new(program: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self { program, runner }
    }
}

impl CliAdapter for GrokAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn build_args(&self, model: &str, prompt: &str) -> Vec<String> {
        vec![
            "-p".to_string(),
            prompt.to_string(),
            "-m".to_string(),
            model.to_string(),
            // quiet
            "-q".to_string(),
        ]
    }

    fn shape(&self) -> OutputShape {
        OutputShape::PlainText
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}
