use clap::{Parser, Subcommand};

/// Ask a council of LLM command-line tools the same question.
///
/// Models are addressed as `provider:model` (codex, claude, gemini, grok).
#[derive(Parser, Debug)]
#[command(name = "council", version, about = "Query LLM CLI tools side by side")]
pub struct CliArgs {
    /// Config profile; keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, env = "COUNCIL_PROFILE", global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a prompt to one or more models (default: the configured council)
    Ask {
        /// Prompt text
        prompt: String,

        /// Model identifier, repeatable (e.g. --model claude:claude-sonnet-4-20250514)
        #[arg(long = "model", short = 'm')]
        models: Vec<String>,

        /// Per-call timeout in seconds (single model only; fan-out uses the default)
        #[arg(long)]
        timeout: Option<f64>,
    },

    /// Send a prompt to the configured chairman model
    Chairman {
        /// Prompt text
        prompt: String,

        /// Per-call timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
    },

    /// Print the loaded configuration as JSON
    Config,
}
