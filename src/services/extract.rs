//! Normalizes the reply out of the different payload shapes completion
//! services answer with (chat-completions, legacy completions, Workers AI,
//! Responses API, Messages API).

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub reasoning: Option<String>,
}

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Pick the reply text and optional reasoning out of an upstream payload.
/// Returns `None` when no candidate field holds a non-blank string.
pub fn extract_completion(payload: &Value) -> Option<Completion> {
    let text = reply_text(payload)?;
    match reasoning_text(payload) {
        Some(reasoning) => Some(Completion {
            text,
            reasoning: Some(reasoning),
        }),
        None => Some(split_think_block(&text)),
    }
}

/// Error text reported inside a 2xx payload, either `"error": "..."` or
/// `"error": { "message": "..." }`.
pub fn reported_error(payload: &Value) -> Option<String> {
    let error = payload.get("error")?;
    non_blank(error).or_else(|| error.get("message").and_then(non_blank))
}

fn reply_text(payload: &Value) -> Option<String> {
    let choice = payload.pointer("/choices/0");
    let message = choice.and_then(|c| c.get("message"));

    message
        .and_then(|m| m.get("content"))
        .and_then(content_text)
        .or_else(|| choice.and_then(|c| c.get("text")).and_then(non_blank))
        .or_else(|| payload.pointer("/result/response").and_then(non_blank))
        .or_else(|| payload.get("response").and_then(non_blank))
        .or_else(|| payload.get("output_text").and_then(non_blank))
        .or_else(|| payload.get("output").and_then(responses_output_text))
        .or_else(|| payload.get("content").and_then(typed_parts(&["text"], "text")))
}

fn reasoning_text(payload: &Value) -> Option<String> {
    let message = payload.pointer("/choices/0/message");

    message
        .and_then(|m| m.get("reasoning_content"))
        .and_then(non_blank)
        .or_else(|| message.and_then(|m| m.get("reasoning")).and_then(non_blank))
        .or_else(|| payload.pointer("/result/reasoning").and_then(non_blank))
        .or_else(|| payload.get("reasoning").and_then(reasoning_value))
        .or_else(|| payload.get("output").and_then(responses_reasoning))
        .or_else(|| {
            payload
                .get("content")
                .and_then(typed_parts(&["thinking"], "thinking"))
        })
}

/// Message content is either a string or a list of `{type, text}` parts.
fn content_text(content: &Value) -> Option<String> {
    non_blank(content).or_else(|| typed_parts(&["text", "output_text"], "text")(content))
}

/// `reasoning` may be a bare string or an object with `summary`/`content`.
fn reasoning_value(reasoning: &Value) -> Option<String> {
    non_blank(reasoning)
        .or_else(|| reasoning.get("summary").and_then(non_blank))
        .or_else(|| reasoning.get("content").and_then(non_blank))
}

fn responses_output_text(output: &Value) -> Option<String> {
    let texts: Vec<String> = output
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) != Some("reasoning"))
        .filter_map(|item| item.get("content"))
        .filter_map(typed_parts(&["output_text", "text"], "text"))
        .collect();
    join_non_empty(texts)
}

fn responses_reasoning(output: &Value) -> Option<String> {
    let texts: Vec<String> = output
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("reasoning"))
        .filter_map(|item| item.get("summary"))
        .filter_map(typed_parts(&["summary_text", "text"], "text"))
        .collect();
    join_non_empty(texts)
}

/// Joins the `field` of every array element whose `type` is one of `kinds`.
/// Untyped elements are accepted too.
fn typed_parts<'a>(kinds: &'a [&'a str], field: &'a str) -> impl Fn(&Value) -> Option<String> + 'a {
    move |parts: &Value| {
        let texts: Vec<String> = parts
            .as_array()?
            .iter()
            .filter(|part| match part.get("type").and_then(Value::as_str) {
                Some(kind) => kinds.iter().any(|k| *k == kind),
                None => true,
            })
            .filter_map(|part| part.get(field))
            .filter_map(non_blank)
            .collect();
        join_non_empty(texts)
    }
}

fn join_non_empty(texts: Vec<String>) -> Option<String> {
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Reasoning models sometimes inline their chain of thought as a leading
/// `<think>...</think>` block.
fn split_think_block(text: &str) -> Completion {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix(THINK_OPEN) {
        if let Some(end) = rest.find(THINK_CLOSE) {
            let thought = rest[..end].trim();
            let answer = rest[end + THINK_CLOSE.len()..].trim();
            if !answer.is_empty() {
                return Completion {
                    text: answer.to_string(),
                    reasoning: (!thought.is_empty()).then(|| thought.to_string()),
                };
            }
        }
    }
    Completion {
        text: text.to_string(),
        reasoning: None,
    }
}
