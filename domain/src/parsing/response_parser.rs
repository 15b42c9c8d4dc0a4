//! Structured data recovery from free-form model output.
//!
//! Models asked for JSON frequently wrap it in prose or a fenced code block.
//! [`parse_response`] tries an ordered list of strategies, each returning
//! `Option<Value>`; the first candidate whose shape matches the
//! [`ExpectedKind`] wins.
//!
//! ```text
//! 1. direct: the trimmed text is itself JSON
//! 2. fenced: body of a ``` or ```json block
//! 3. embedded: greedy {...} / [...] span anywhere in the text
//! ```

use crate::core::string::char_prefix;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of leading characters of the raw input kept in a [`ParseError`].
pub const ERROR_SNIPPET_CHARS: usize = 200;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));
static EMBEDDED_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object regex"));
static EMBEDDED_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array regex"));

/// Shape the caller expects the recovered JSON to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedKind {
    /// A JSON object
    Dict,
    /// A JSON array
    List,
    /// Either an object or an array
    #[default]
    Auto,
}

impl ExpectedKind {
    pub fn as_str(&self) -> &str {
        match self {
            ExpectedKind::Dict => "dict",
            ExpectedKind::List => "list",
            ExpectedKind::Auto => "auto",
        }
    }

    /// Whether a parsed value has the expected shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ExpectedKind::Dict => value.is_object(),
            ExpectedKind::List => value.is_array(),
            ExpectedKind::Auto => value.is_object() || value.is_array(),
        }
    }

    fn wants_object(&self) -> bool {
        matches!(self, ExpectedKind::Dict | ExpectedKind::Auto)
    }

    fn wants_array(&self) -> bool {
        matches!(self, ExpectedKind::List | ExpectedKind::Auto)
    }
}

impl std::fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every strategy failed to recover JSON of the expected kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse JSON from response. Expected {expected}. Raw response: {snippet}")]
pub struct ParseError {
    /// First [`ERROR_SNIPPET_CHARS`] characters of the raw input.
    pub snippet: String,
    pub expected: ExpectedKind,
}

impl ParseError {
    fn new(raw: &str, expected: ExpectedKind) -> Self {
        Self {
            snippet: char_prefix(raw, ERROR_SNIPPET_CHARS),
            expected,
        }
    }
}

type Strategy = fn(&str, ExpectedKind) -> Option<Value>;

const STRATEGIES: [(&str, Strategy); 3] = [
    ("direct", parse_direct),
    ("fenced", parse_fenced),
    ("embedded", parse_embedded),
];

/// Recover a JSON value of the expected kind from raw model output.
///
/// Empty or whitespace-only input fails immediately.
pub fn parse_response(raw: &str, expected: ExpectedKind) -> Result<Value, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::new(raw, expected));
    }

    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            strategy(raw, expected).inspect(|_| debug!(strategy = name, "Recovered JSON"))
        })
        .ok_or_else(|| ParseError::new(raw, expected))
}

/// Like [`parse_response`], but degrades to `default` and logs a warning.
pub fn parse_or_default(raw: &str, expected: ExpectedKind, default: Value) -> Value {
    match parse_response(raw, expected) {
        Ok(value) => value,
        Err(e) => {
            warn!("{}; using default", e);
            default
        }
    }
}

/// Extract the named fields from an object, reporting all missing ones.
pub fn require_fields(
    data: &Map<String, Value>,
    fields: &[&str],
) -> Result<Map<String, Value>, Vec<String>> {
    let mut extracted = Map::new();
    let mut missing = Vec::new();

    for field in fields {
        match data.get(*field) {
            Some(value) => {
                extracted.insert((*field).to_string(), value.clone());
            }
            None => missing.push((*field).to_string()),
        }
    }

    if missing.is_empty() {
        Ok(extracted)
    } else {
        Err(missing)
    }
}

fn accept(candidate: &str, expected: ExpectedKind) -> Option<Value> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(|value| expected.accepts(value))
}

fn parse_direct(raw: &str, expected: ExpectedKind) -> Option<Value> {
    accept(raw.trim(), expected)
}

fn parse_fenced(raw: &str, expected: ExpectedKind) -> Option<Value> {
    FENCED_BLOCK
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| accept(body.as_str(), expected))
}

fn parse_embedded(raw: &str, expected: ExpectedKind) -> Option<Value> {
    let object = expected
        .wants_object()
        .then(|| EMBEDDED_OBJECT.find(raw))
        .flatten()
        .and_then(|m| accept(m.as_str(), expected));

    object.or_else(|| {
        expected
            .wants_array()
            .then(|| EMBEDDED_ARRAY.find(raw))
            .flatten()
            .and_then(|m| accept(m.as_str(), expected))
    })
}
