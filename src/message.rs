//! Turn a Codex notify payload into a short Slack message.
//!
//! Payloads have no fixed schema. Each displayed field is looked up under a
//! few synonyms and the first truthy one wins; anything missing is left out.

use serde_json::{Map, Value};

/// Sent when the payload carries none of the recognized fields.
pub const DEFAULT_MESSAGE: &str = "Codex task completed.";

const TITLE_KEYS: &[&str] = &["title", "event", "task"];
const STATUS_KEYS: &[&str] = &["status", "state"];
const SUMMARY_KEYS: &[&str] = &["summary", "message", "details"];
const DURATION_KEYS: &[&str] = &["duration", "elapsed", "time"];
const URL_KEYS: &[&str] = &["url", "link", "target"];

/// Build the message text for `payload`.
///
/// `default_title` is used when the payload has no title of its own. A payload
/// that is not a JSON object is treated as empty. Never fails.
pub fn build_message(payload: &Value, default_title: Option<&str>) -> String {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);

    let title = first_present(fields, TITLE_KEYS)
        .or_else(|| default_title.filter(|t| !t.is_empty()).map(String::from));
    let status = first_present(fields, STATUS_KEYS);
    let summary = first_present(fields, SUMMARY_KEYS);
    let duration = first_present(fields, DURATION_KEYS);
    let url = first_present(fields, URL_KEYS);

    let mut lines = Vec::new();
    if let Some(title) = title {
        lines.push(title);
    }
    if let Some(status) = status {
        lines.push(format!("Status: {status}"));
    }
    if let Some(duration) = duration {
        lines.push(format!("Duration: {duration}"));
    }
    if let Some(summary) = summary {
        lines.push(summary);
    }
    if let Some(url) = url {
        lines.push(format!("Details: {url}"));
    }

    if lines.is_empty() {
        return DEFAULT_MESSAGE.to_string();
    }
    lines.join("\n")
}

/// First truthy value among `keys`, rendered as text.
fn first_present(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| is_truthy(value))
        .map(display_value)
}

/// JSON truthiness: null, false, zero and empty string/array/object are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings are shown verbatim; everything else as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
