//! Error taxonomy for the RPC layer plus detection of the node's structured
//! error envelope.

use serde::{Deserialize, Serialize};
use std::fmt;

const BODY_EXCERPT_LIMIT: usize = 256;
const ENVELOPE_MESSAGE_KEYS: [&str; 3] = ["id", "msg", "error"];

/// The four ways a call can fail. Operations surface these inside an
/// `anyhow::Error` chain; use `err.downcast_ref::<RpcError>()` to inspect.
#[derive(Debug)]
pub enum RpcError {
    /// The input was rejected before any request was built.
    Validation { message: String },
    /// The request never produced a response (connect, TLS, timeout).
    Transport { source: anyhow::Error },
    /// The node answered with its error envelope or a non-success status.
    Rpc { status: u16, errors: Vec<NodeError>, body: String },
    /// The body could not be parsed into the expected shape.
    Decode { source: serde_json::Error, body: String },
}

impl RpcError {
    pub fn validation(message: impl Into<String>) -> Self {
        RpcError::Validation {
            message: message.into(),
        }
    }

    pub fn transport(source: impl Into<anyhow::Error>) -> Self {
        RpcError::Transport {
            source: source.into(),
        }
    }

    pub fn decode(source: serde_json::Error, body: &[u8]) -> Self {
        RpcError::Decode {
            source,
            body: excerpt(body),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RpcError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport { .. })
    }

    pub fn is_rpc(&self) -> bool {
        matches!(self, RpcError::Rpc { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RpcError::Decode { .. })
    }

    /// Entries of the node's error envelope, empty for every other kind.
    pub fn node_errors(&self) -> &[NodeError] {
        match self {
            RpcError::Rpc { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Validation { message } => write!(f, "invalid input: {message}"),
            RpcError::Transport { source } => write!(f, "rpc transport failure: {source}"),
            RpcError::Rpc { status, errors, body } => match errors.first() {
                Some(first) => {
                    write!(f, "rpc error ({}): {}", first.kind, first.message())?;
                    for other in &errors[1..] {
                        write!(f, "; ({}): {}", other.kind, other.message())?;
                    }
                    Ok(())
                }
                None => write!(f, "rpc returned status {status}: {body}"),
            },
            RpcError::Decode { source, .. } => write!(f, "failed to parse json: {source}"),
        }
    }
}

impl std::error::Error for RpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcError::Transport { source } => Some(source.as_ref()),
            RpcError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One entry of the node's error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeError {
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    /// `msg` on protocol errors, `error` on the shell's `generic` errors.
    #[serde(default, alias = "message", alias = "error")]
    pub msg: Option<String>,
}

impl NodeError {
    /// Human readable message: `msg` when present, otherwise the error id.
    pub fn message(&self) -> &str {
        self.msg
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("unknown error")
    }
}

/// Returns the envelope entries when `body` is the node's error envelope: a
/// non-empty JSON array of objects that each carry a string `kind` plus at
/// least one of `id`, `msg` or `error`.
pub fn parse_error_envelope(body: &[u8]) -> Option<Vec<NodeError>> {
    let start = body
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(body.len());
    let trimmed = &body[start..];
    if !trimmed.starts_with(b"[") {
        return None;
    }

    let entries: Vec<serde_json::Value> = serde_json::from_slice(trimmed).ok()?;
    if entries.is_empty() || !entries.iter().all(is_envelope_entry) {
        return None;
    }

    Some(entries.iter().map(node_error).collect())
}

/// Builds an entry field by field so an object carrying both `msg` and
/// `error` still reads as an error.
fn node_error(entry: &serde_json::Value) -> NodeError {
    let text = |key: &str| entry.get(key).and_then(serde_json::Value::as_str).map(str::to_owned);
    NodeError {
        kind: text("kind").unwrap_or_default(),
        id: text("id"),
        msg: text("msg").or_else(|| text("message")).or_else(|| text("error")),
    }
}

fn is_envelope_entry(entry: &serde_json::Value) -> bool {
    let Some(object) = entry.as_object() else {
        return false;
    };
    object.get("kind").is_some_and(serde_json::Value::is_string)
        && ENVELOPE_MESSAGE_KEYS
            .iter()
            .any(|key| object.contains_key(*key))
}

pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_EXCERPT_LIMIT {
        return text.into_owned();
    }
    let mut short: String = text.chars().take(BODY_EXCERPT_LIMIT).collect();
    short.push_str("...");
    short
}
