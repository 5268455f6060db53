//! End-to-end tests against mock CLI tools written as shell scripts.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use council_core::Config;
use council_llm::{Dispatcher, LlmError, Message};
use tempfile::TempDir;

const SCRIPTS: &[(&str, &str)] = &[
    (
        "codex_ok",
        r#"printf '%s\n' '{"message":{"role":"user","content":"X"}}' '{"message":{"role":"assistant","content":"Y"}}'"#,
    ),
    ("claude_ok", r#"printf '%s' '{"completion":{"text":"hi"}}'"#),
    ("claude_garbled", "echo '  not json {  '"),
    ("echo_args", r#"printf '%s|' "$@""#),
    ("fail", "echo 'model not found' >&2; exit 1"),
    ("hang", "exec sleep 30"),
    ("slow_plain", "sleep 1; echo slow answer"),
    ("slow_json", r#"sleep 1; printf '%s' '{"output":"slow json"}'"#),
];

/// Scripts are written once, before any test spawns a process, so no test ever
/// executes a file another thread still holds open for writing.
fn scripts_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        for (name, body) in SCRIPTS {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
    .path()
}

fn script(name: &str) -> String {
    let path: PathBuf = scripts_dir().join(name);
    path.to_string_lossy().into_owned()
}

fn config(codex: &str, claude: &str, gemini: &str, grok: &str) -> Config {
    let mut config = Config::for_profile("CLITOOLSTEST");
    config.tools.codex = script(codex);
    config.tools.claude = script(claude);
    config.tools.gemini = script(gemini);
    config.tools.grok = script(grok);
    config.timeout_secs = 20.0;
    config
}

fn prompt(text: &str) -> Vec<Message> {
    vec![Message::user(text)]
}

#[tokio::test]
async fn codex_jsonl_returns_last_assistant_message() {
    let d = Dispatcher::from_config(&config("codex_ok", "fail", "fail", "fail"));

    let result = d.query_model("codex:gpt-5.1-codex", &prompt("hi"), None).await;

    assert_eq!(result.unwrap().unwrap().content, "Y");
}

#[tokio::test]
async fn claude_json_object_and_fallback() {
    let d = Dispatcher::from_config(&config("fail", "claude_ok", "fail", "fail"));
    let result = d.query_model("claude:sonnet", &prompt("hi"), None).await;
    assert_eq!(result.unwrap().unwrap().content, "hi");

    let d = Dispatcher::from_config(&config("fail", "claude_garbled", "fail", "fail"));
    let result = d.query_model("claude:sonnet", &prompt("hi"), None).await;
    assert_eq!(result.unwrap().unwrap().content, "not json {");
}

#[tokio::test]
async fn argument_vectors_reach_the_tool() {
    let d = Dispatcher::from_config(&config("echo_args", "echo_args", "echo_args", "echo_args"));
    let messages = prompt("two words");

    let gemini = d.query_model("gemini:gemini-2.5-pro", &messages, None).await;
    assert_eq!(
        gemini.unwrap().unwrap().content,
        "-p|two words|-m|gemini-2.5-pro|"
    );

    let grok = d.query_model("grok:grok-4", &messages, None).await;
    assert_eq!(grok.unwrap().unwrap().content, "-p|two words|-m|grok-4|-q|");

    // Codex output is not JSON lines here, so the raw text comes back.
    let codex = d.query_model("codex:m", &messages, None).await;
    assert_eq!(codex.unwrap().unwrap().content, "exec|two words|-m|m|--json|");

    let claude = d.query_model("claude:m", &messages, None).await;
    assert_eq!(
        claude.unwrap().unwrap().content,
        "--print|--output-format|json|--model|m|two words|"
    );
}

#[tokio::test]
async fn failing_tool_yields_none() {
    let d = Dispatcher::from_config(&config("fail", "fail", "fail", "fail"));

    let result = d.query_model("gemini:b", &prompt("hi"), None).await;

    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn missing_binary_yields_none() {
    let mut config = config("fail", "fail", "fail", "fail");
    config.tools.grok = "/nonexistent/grok-cli".into();
    let d = Dispatcher::from_config(&config);

    assert_eq!(d.query_model("grok:grok-4", &prompt("hi"), None).await, Ok(None));
}

#[tokio::test]
async fn hanging_tool_is_killed_after_timeout() {
    let d = Dispatcher::from_config(&config("hang", "fail", "fail", "fail"));
    let start = Instant::now();

    let result = d
        .query_model("codex:a", &prompt("hi"), Some(Duration::from_millis(500)))
        .await;

    assert_eq!(result, Ok(None));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn invalid_identifier_fails_before_spawning() {
    let d = Dispatcher::from_config(&config("hang", "hang", "hang", "hang"));
    let start = Instant::now();

    let err = d.query_model("codex", &prompt("hi"), None).await.unwrap_err();

    assert_eq!(err, LlmError::MalformedModel("codex".into()));
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn fan_out_waits_for_slowest_not_sum() {
    let d = Dispatcher::from_config(&config("slow_plain", "slow_json", "slow_plain", "fail"));
    let start = Instant::now();

    let results = d
        .query_models_parallel(
            &["codex:a", "claude:b", "gemini:c", "grok:d"],
            &prompt("hi"),
        )
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 4);
    assert_eq!(results["codex:a"].as_ref().unwrap().content, "slow answer");
    assert_eq!(results["claude:b"].as_ref().unwrap().content, "slow json");
    assert_eq!(results["gemini:c"].as_ref().unwrap().content, "slow answer");
    assert_eq!(results["grok:d"], None);

    // Three one-second tools: sequential would take at least three seconds.
    assert!(elapsed < Duration::from_millis(2500), "took {elapsed:?}");
}
