//! Load the notify payload from an argument, a file or piped stdin.

use std::io::{IsTerminal, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::slack::NotificationError;

/// Load the payload. Priority: `inline`, then `file`, then stdin when it is
/// not a terminal. No input at all gives an empty object.
pub fn load_payload(inline: Option<&str>, file: Option<&Path>) -> Result<Value, NotificationError> {
    if let Some(raw) = inline {
        return parse_payload(raw);
    }

    if let Some(path) = file {
        let raw = std::fs::read_to_string(path).map_err(|source| NotificationError::PayloadFile {
            path: path.display().to_string(),
            source,
        })?;
        return parse_payload(&raw);
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(empty_payload());
    }
    read_payload(stdin.lock())
}

/// Read a whole payload from `reader`. Read failures, including input that is
/// not UTF-8, are errors rather than an empty payload.
pub fn read_payload(mut reader: impl Read) -> Result<Value, NotificationError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(NotificationError::PayloadRead)?;
    parse_payload(&raw)
}

/// Parse raw payload text; blank input is an empty object.
pub fn parse_payload(raw: &str) -> Result<Value, NotificationError> {
    if raw.trim().is_empty() {
        return Ok(empty_payload());
    }
    serde_json::from_str(raw).map_err(NotificationError::InvalidPayload)
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}
