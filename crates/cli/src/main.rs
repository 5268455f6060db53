mod cli;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use council_core::config::{load_dotenv, Config};
use council_llm::{Dispatcher, Message, QueryResponse};

use crate::cli::{CliArgs, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    load_dotenv();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = Config::for_profile(args.profile.as_deref().unwrap_or(""));
    config.log_summary();
    if let Err(e) = config.validate() {
        warn!(error = %e, "configuration problem");
    }

    let dispatcher = Dispatcher::from_config(&config);

    match args.command {
        Command::Ask {
            prompt,
            models,
            timeout,
        } => {
            let messages = vec![Message::user(prompt)];
            let timeout = parse_timeout(timeout)?;

            let results: BTreeMap<String, Option<QueryResponse>> = match models.as_slice() {
                [] => dispatcher.query_council(&messages).await?.into_iter().collect(),
                [single] => {
                    let result = dispatcher.query_model(single, &messages, timeout).await?;
                    BTreeMap::from([(single.clone(), result)])
                }
                many => {
                    if timeout.is_some() {
                        warn!("--timeout only applies to single-model queries; using the default");
                    }
                    dispatcher
                        .query_models_parallel(many, &messages)
                        .await?
                        .into_iter()
                        .collect()
                }
            };

            print_json(&results)?;
            if results.values().all(Option::is_none) {
                bail!("no model produced an answer");
            }
        }
        Command::Chairman { prompt, timeout } => {
            let messages = vec![Message::user(prompt)];
            let timeout = parse_timeout(timeout)?;

            let result = dispatcher.query_chairman(&messages, timeout).await?;
            let failed = result.is_none();
            print_json(&BTreeMap::from([(
                dispatcher.chairman_model().to_string(),
                result,
            )]))?;
            if failed {
                bail!("chairman model '{}' produced no answer", dispatcher.chairman_model());
            }
        }
        Command::Config => print_json(&config)?,
    }

    Ok(())
}

fn parse_timeout(secs: Option<f64>) -> Result<Option<Duration>> {
    secs.map(Duration::try_from_secs_f64)
        .transpose()
        .context("--timeout must be a non-negative number of seconds")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
