//! Output parsing for the three shapes CLI tools print.
//!
//! Every path ends in a textual fallback, so a tool that exited successfully
//! always yields some content.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

/// Encoding of a tool's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// One JSON event per line; the last assistant message wins.
    JsonLines,
    /// A single JSON object whose schema varies between tool versions.
    JsonObject,
    /// Plain text, used verbatim.
    PlainText,
}

pub fn extract_content(shape: OutputShape, raw: &str) -> String {
    match shape {
        OutputShape::JsonLines => {
            last_assistant_message(raw).unwrap_or_else(|| raw.trim().to_string())
        }
        OutputShape::JsonObject => match serde_json::from_str::<Value>(raw) {
            Ok(payload) => extract_from_object(&payload),
            Err(_) => raw.trim().to_string(),
        },
        OutputShape::PlainText => raw.trim().to_string(),
    }
}

/// Scan a JSON-lines event stream for the last assistant (or role-less) message.
///
/// Blank lines, unparseable lines and non-object lines are skipped. An empty
/// final candidate counts as no candidate.
pub fn last_assistant_message(raw: &str) -> Option<String> {
    let mut last: Option<String> = None;

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let Ok(Value::Object(event)) = serde_json::from_str::<Value>(line) else {
            continue;
        };

        let Some(Value::Object(msg)) = first_truthy(&event, &["message", "data", "event"])
        else {
            continue;
        };

        let from_assistant = match msg.get("role") {
            None | Some(Value::Null) => true,
            Some(role) => role.as_str() == Some("assistant"),
        };
        if let Some(Value::String(content)) = msg.get("content") {
            if from_assistant {
                last = Some(content.clone());
            }
        }
    }

    last.filter(|c| !c.is_empty())
}

type Strategy = fn(&Value) -> Option<String>;

/// Extraction strategies for single-object output, tried in order.
const OBJECT_STRATEGIES: &[Strategy] = &[nested_completion, top_level_text, message_content];

/// Pull text out of a parsed JSON value, falling back to its JSON encoding.
pub fn extract_from_object(payload: &Value) -> String {
    OBJECT_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(payload))
        .unwrap_or_else(|| to_spaced_json(payload))
}

/// JSON text in the tool's key order with `", "` and `": "` separators.
fn to_spaced_json(payload: &Value) -> String {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    if payload.serialize(&mut ser).is_err() {
        return payload.to_string();
    }
    String::from_utf8(ser.into_inner()).unwrap_or_else(|_| payload.to_string())
}

/// Single-line formatter with a space after each `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// `{"completion": {"text": ..}}`, `{"result": {"content": ..}}` and friends.
fn nested_completion(payload: &Value) -> Option<String> {
    let obj = payload.as_object()?;
    let inner = first_truthy(obj, &["completion", "result"])?.as_object()?;
    first_truthy(inner, &["text", "content"])?
        .as_str()
        .map(str::to_string)
}

/// `{"output": ..}` or `{"text": ..}`.
fn top_level_text(payload: &Value) -> Option<String> {
    let obj = payload.as_object()?;
    first_truthy(obj, &["output", "text"])?
        .as_str()
        .map(str::to_string)
}

/// `{"message": {"content": ..}}`.
fn message_content(payload: &Value) -> Option<String> {
    payload
        .get("message")?
        .as_object()?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

/// First truthy value among `keys`, otherwise whatever sits under the last key.
fn first_truthy<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let mut value = None;
    for key in keys {
        value = obj.get(*key);
        if value.is_some_and(is_truthy) {
            break;
        }
    }
    value
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
