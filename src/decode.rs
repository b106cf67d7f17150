//! Recovery of a JSON object from a free-form model reply.
//!
//! Providers wrap the generated text in different envelopes and models like to
//! put JSON inside markdown fences. Both are handled as ordered strategy
//! lists: the first locator that finds a reply wins, then the first text
//! strategy that yields a JSON object wins.

use serde_json::Value;
use tracing::{debug, warn};

/// Characters of the reply included in failure logs.
const PREVIEW_CHARS: usize = 500;

type Locator = fn(&Value) -> Option<&Value>;
type TextStrategy = fn(&str) -> Option<&str>;

/// Where the generated reply can sit inside a response envelope, in order.
const LOCATORS: &[(&str, Locator)] = &[
    ("result.message.content", result_message_content),
    ("message.content", message_content),
    ("choices[0].message.content", first_choice_content),
    ("content", content),
    ("bare string", bare_string),
];

/// How JSON can be embedded in reply text, in order.
const TEXT_STRATEGIES: &[(&str, TextStrategy)] = &[
    ("json fence", json_fence),
    ("generic fence", generic_fence),
    ("whole reply", whole_reply),
];

/// Extracts the model's JSON object from a raw response envelope.
///
/// Returns `None` when no reply can be located or no strategy yields a JSON
/// object. A reply that is already structured is used as-is when it is an
/// object; any other structured reply is rejected. Never fails.
#[must_use]
pub fn decode(envelope: &Value) -> Option<Value> {
    let Some((source, reply)) = locate_reply(envelope) else {
        warn!(preview = %preview(&envelope.to_string()), "unknown response envelope");
        return None;
    };
    debug!(source, "located model reply");

    let text = match reply {
        Value::Object(_) => return Some(reply.clone()),
        Value::String(text) => text,
        other => {
            warn!(source, value = %other, "model reply is neither text nor an object");
            return None;
        }
    };

    for (name, strategy) in TEXT_STRATEGIES {
        let Some(candidate) = strategy(text) else {
            continue;
        };
        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => {
                debug!(strategy = name, "decoded model reply");
                return Some(value);
            }
            Ok(_) => debug!(strategy = name, "candidate is JSON but not an object"),
            Err(e) => debug!(strategy = name, error = %e, "candidate did not parse"),
        }
    }

    warn!(preview = %preview(text), "model reply contains no JSON object");
    None
}

fn locate_reply(envelope: &Value) -> Option<(&'static str, &Value)> {
    LOCATORS.iter().find_map(|(name, locate)| {
        locate(envelope).filter(|v| !is_blank(v)).map(|v| (*name, v))
    })
}

fn result_message_content(v: &Value) -> Option<&Value> {
    v.pointer("/result/message/content")
}

fn message_content(v: &Value) -> Option<&Value> {
    v.pointer("/message/content")
}

fn first_choice_content(v: &Value) -> Option<&Value> {
    v.pointer("/choices/0/message/content")
}

fn content(v: &Value) -> Option<&Value> {
    v.get("content")
}

fn bare_string(v: &Value) -> Option<&Value> {
    v.is_string().then_some(v)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Body of the first ```` ```json ```` block (tag matched case-insensitively).
fn json_fence(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Body of the first ```` ``` ```` block, skipping a language tag line.
fn generic_fence(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let end = rest.find("```")?;
    let body = &rest[..end];

    match body.split_once('\n') {
        Some((tag, tail)) if is_language_tag(tag) => Some(tail.trim()),
        _ => Some(body.trim()),
    }
}

fn whole_reply(text: &str) -> Option<&str> {
    Some(text.trim())
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
