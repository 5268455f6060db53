use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_secs(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .unwrap_or(default)
}

fn profiled_env_list(profile: &str, key: &str, default: &[&str]) -> Vec<String> {
    match profiled_env_opt(profile, key) {
        Some(raw) => split_list(&raw),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

pub const DEFAULT_COUNCIL_MODELS: &[&str] = &[
    "codex:gpt-5.1-codex",
    "codex:gpt-5.1-codex-mini",
    "claude:claude-sonnet-4-20250514",
    "gemini:gemini-2.5-pro",
    "grok:grok-4",
];

pub const DEFAULT_CHAIRMAN_MODEL: &str = "codex:gpt-5.1-codex";

/// Provider prefixes that have a tool path. Same names, same order as
/// `ProviderKind::as_str` in `council-llm`; a test there keeps them in step.
pub const PROVIDER_NAMES: [&str; 4] = ["codex", "claude", "gemini", "grok"];

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub tools: ToolPaths,
    /// Default per-call timeout in seconds.
    pub timeout_secs: f64,
    pub council: CouncilConfig,
    pub data_dir: PathBuf,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `COUNCIL_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("COUNCIL_PROFILE", "").trim().to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            tools: ToolPaths::from_env_profiled(p),
            timeout_secs: profiled_env_secs(p, "LLM_CLI_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            council: CouncilConfig::from_env_profiled(p),
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data/conversations")),
        }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Check that every configured model addresses a provider with a tool path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.council.models.is_empty() {
            return Err(ConfigError::NoCouncilModels);
        }
        self.council
            .models
            .iter()
            .chain(std::iter::once(&self.council.chairman))
            .try_for_each(|model| self.check_model(model))
    }

    fn check_model(&self, model: &str) -> Result<(), ConfigError> {
        let provider = match model.split_once(':') {
            Some((provider, _)) if !provider.is_empty() => provider,
            _ => return Err(ConfigError::MalformedModel(model.to_string())),
        };
        if self.tools.for_provider(provider).is_none() {
            return Err(ConfigError::UnknownProvider {
                provider: provider.to_string(),
                model: model.to_string(),
            });
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  tools:    codex={}, claude={}, gemini={}, grok={}",
            self.tools.codex,
            self.tools.claude,
            self.tools.gemini,
            self.tools.grok
        );
        tracing::info!("  timeout:  {}s", self.timeout_secs);
        tracing::info!("  council:  {}", self.council.models.join(", "));
        tracing::info!("  chairman: {}", self.council.chairman);
        tracing::info!("  data_dir: {}", self.data_dir.display());
    }
}

// ── CLI tool paths ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolPaths {
    pub codex: String,
    pub claude: String,
    pub gemini: String,
    pub grok: String,
}

impl ToolPaths {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            codex: profiled_env_or(p, "CODEX_CLI", "codex"),
            claude: profiled_env_or(p, "CLAUDE_CLI", "claude"),
            gemini: profiled_env_or(p, "GEMINI_CLI", "gemini"),
            grok: profiled_env_or(p, "GROK_CLI", "grok"),
        }
    }

    /// Binary path for a provider prefix, one of [`PROVIDER_NAMES`].
    pub fn for_provider(&self, provider: &str) -> Option<&str> {
        match provider {
            "codex" => Some(self.codex.as_str()),
            "claude" => Some(self.claude.as_str()),
            "gemini" => Some(self.gemini.as_str()),
            "grok" => Some(self.grok.as_str()),
            _ => None,
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            codex: "codex".to_string(),
            claude: "claude".to_string(),
            gemini: "gemini".to_string(),
            grok: "grok".to_string(),
        }
    }
}

// ── Council membership ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Provider-prefixed model identifiers, e.g. "claude:claude-sonnet-4-20250514".
    pub models: Vec<String>,
    /// Model that synthesizes the final answer.
    pub chairman: String,
}

impl CouncilConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            models: profiled_env_list(p, "COUNCIL_MODELS", DEFAULT_COUNCIL_MODELS),
            chairman: profiled_env_or(p, "CHAIRMAN_MODEL", DEFAULT_CHAIRMAN_MODEL),
        }
    }
}
