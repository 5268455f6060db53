//! Routing of `provider:model` identifiers to CLI adapters, single and fan-out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use council_core::config::CouncilConfig;
use council_core::Config;
use futures::future::join_all;
use tracing::info;

use crate::provider::{LlmError, Message, ProviderKind, QueryResponse};
use crate::providers::AdapterSet;
use crate::runner::{CommandRunner, ProcessRunner};

/// A parsed `provider:model` identifier. The model part is passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderKind,
    pub model: String,
}

impl ModelId {
    /// Split on the first `:`; the model name may itself contain colons.
    pub fn parse(identifier: &str) -> Result<Self, LlmError> {
        let (provider, model) = identifier
            .split_once(':')
            .filter(|(provider, _)| !provider.is_empty())
            .ok_or_else(|| LlmError::MalformedModel(identifier.to_string()))?;

        Ok(Self {
            provider: provider.parse()?,
            model: model.to_string(),
        })
    }
}

/// Resolves model identifiers to adapters and runs queries against them.
pub struct Dispatcher {
    adapters: AdapterSet,
    default_timeout: Duration,
    council: CouncilConfig,
}

impl Dispatcher {
    /// Build with the tokio process runner.
    pub fn from_config(config: &Config) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    pub fn with_runner(config: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            adapters: AdapterSet::new(&config.tools, runner),
            default_timeout: config.default_timeout(),
            council: config.council.clone(),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn council_models(&self) -> &[String] {
        &self.council.models
    }

    pub fn chairman_model(&self) -> &str {
        &self.council.chairman
    }

    /// Query one model with the last message's content as the prompt.
    ///
    /// Argument problems are returned as `Err` before any process is launched.
    /// Tool failures and timeouts come back as `Ok(None)`.
    pub async fn query_model(
        &self,
        model: &str,
        messages: &[Message],
        timeout: Option<Duration>,
    ) -> Result<Option<QueryResponse>, LlmError> {
        let timeout = timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(self.default_timeout);

        let last = messages.last().ok_or(LlmError::EmptyMessages)?;
        if last.content.is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        let id = ModelId::parse(model)?;
        let adapter = self.adapters.get(id.provider);

        info!(provider = %id.provider, model = %id.model, "query_model start");
        let start = Instant::now();

        let result = adapter.query(&id.model, &last.content, timeout).await;

        info!(
            provider = %id.provider,
            model = %id.model,
            success = result.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query_model done"
        );
        Ok(result)
    }

    /// Query every model concurrently and wait for all of them.
    ///
    /// Results are keyed by the identifier as given; a repeated identifier keeps
    /// the result of its last occurrence. If any identifier is invalid, the first
    /// such error is returned once all launched queries have finished.
    pub async fn query_models_parallel<S: AsRef<str>>(
        &self,
        models: &[S],
        messages: &[Message],
    ) -> Result<HashMap<String, Option<QueryResponse>>, LlmError> {
        let futures: Vec<_> = models
            .iter()
            .map(|model| self.query_model(model.as_ref(), messages, None))
            .collect();

        let results = join_all(futures).await;

        let mut outputs = HashMap::with_capacity(models.len());
        for (model, result) in models.iter().zip(results) {
            outputs.insert(model.as_ref().to_string(), result?);
        }
        Ok(outputs)
    }

    /// Fan out to the configured council members.
    pub async fn query_council(
        &self,
        messages: &[Message],
    ) -> Result<HashMap<String, Option<QueryResponse>>, LlmError> {
        self.query_models_parallel(self.council.models.as_slice(), messages)
            .await
    }

    /// Query the configured chairman model.
    pub async fn query_chairman(
        &self,
        messages: &[Message],
        timeout: Option<Duration>,
    ) -> Result<Option<QueryResponse>, LlmError> {
        self.query_model(&self.council.chairman, messages, timeout).await
    }
}
