use std::sync::Arc;

use crate::parse::OutputShape;
use crate::provider::{CliAdapter, ProviderKind};
use crate::runner::CommandRunner;

pub struct GeminiAdapter {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl GeminiAdapter {
    pub fn new(program: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self { program, runner }
    }
}

impl CliAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
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
        ]
    }

    fn shape(&self) -> OutputShape {
        OutputShape::PlainText
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::runner::fake::{ok, FakeRunner};

    #[test]
    fn prompt_and_model_are_flag_values() {
        let adapter = GeminiAdapter::new("gemini".into(), Arc::new(FakeRunner::default()));
        assert_eq!(
            adapter.build_args("gemini-2.5-pro", "hello"),
            vec!["-p", "hello", "-m", "gemini-2.5-pro"]
        );
    }

    #[tokio::test]
    async fn output_is_used_verbatim() {
        let runner = FakeRunner::default().respond("gemini", ok("\n{\"output\": \"raw\"}\n"));
        let adapter = GeminiAdapter::new("gemini".into(), Arc::new(runner));

        let result = adapter.query("m", "p", Duration::from_secs(5)).await.unwrap();
        assert_eq!(result.content, "{\"output\": \"raw\"}");
    }
}
