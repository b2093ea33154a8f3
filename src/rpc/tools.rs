//! Tool definitions and dispatch for the stdio server.
//!
//! Each tool maps to a `MemberLens` method. Definitions carry JSON Schema
//! so clients can discover the parameters.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{MemberLensError, Result};
use crate::lens::MemberLens;
use crate::report::{format_matches_as_text, format_resolution_as_text};

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

/// A tool definition exposed by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Returns every tool the server exposes.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "members_resolve".to_string(),
            description: "Resolve a mention, id, name#tag, username or nickname to a community member. Ties are reported as ambiguous.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "token": {
                        "type": "string",
                        "description": "Text typed by the user, already trimmed"
                    }
                },
                "required": ["token"]
            }),
        },
        ToolDefinition {
            name: "members_explain".to_string(),
            description: "List every member a token matched, with the best score and the rule that produced it.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "token": {
                        "type": "string",
                        "description": "Text typed by the user, already trimmed"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of candidates to return (default: 10)"
                    }
                },
                "required": ["token"]
            }),
        },
        ToolDefinition {
            name: "members_status".to_string(),
            description: "Return statistics about the loaded channel and community rosters.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Dispatches a tool call to its handler.
///
/// `server_stats` is merged into the `members_status` output when present.
pub fn handle_tool_call(
    lens: &MemberLens,
    tool_name: &str,
    args: Value,
    server_stats: Option<Value>,
) -> Result<Value> {
    match tool_name {
        "members_resolve" => handle_resolve(lens, args),
        "members_explain" => handle_explain(lens, args),
        "members_status" => handle_status(lens, server_stats),
        _ => Err(MemberLensError::InvalidParams {
            message: format!("unknown tool: {}", tool_name),
        }),
    }
}

/// Truncates a string to at most `MAX_RESPONSE_CHARS` bytes, cutting on a
/// character boundary.
fn truncate_response(s: &str) -> String {
    if s.len() <= MAX_RESPONSE_CHARS {
        return s.to_string();
    }
    let mut end = MAX_RESPONSE_CHARS;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}\n\n[... truncated at {} bytes]", &s[..end], end)
}

fn text_content(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": truncate_response(text) }]
    })
}

fn required_token(args: &Value) -> Result<&str> {
    let token = args
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MemberLensError::InvalidParams {
            message: "missing required parameter: token".to_string(),
        })?;
    if token.is_empty() {
        return Err(MemberLensError::InvalidParams {
            message: "parameter 'token' must not be empty".to_string(),
        });
    }
    Ok(token)
}

fn handle_resolve(lens: &MemberLens, args: Value) -> Result<Value> {
    let token = required_token(&args)?;
    let resolution = lens.resolve(token);
    let text = format_resolution_as_text(token, &resolution, lens.config().max_listed_candidates);

    let mut result = text_content(&text);
    result["structuredContent"] = serde_json::to_value(&resolution)?;
    Ok(result)
}

fn handle_explain(lens: &MemberLens, args: Value) -> Result<Value> {
    let token = required_token(&args)?;
    let limit = args
        .get("limit")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .unwrap_or(10);

    let mut matches = lens.explain(token);
    matches.truncate(limit);
    Ok(text_content(&format_matches_as_text(token, &matches)))
}

fn handle_status(lens: &MemberLens, server_stats: Option<Value>) -> Result<Value> {
    let mut output = serde_json::to_value(lens.stats())?;
    if let Some(stats) = server_stats {
        output["server"] = stats;
    }
    let formatted = serde_json::to_string_pretty(&output).unwrap_or_default();
    Ok(text_content(&formatted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_response() {
        assert_eq!(truncate_response("hello"), "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let long = "é".repeat(10_000);
        let result = truncate_response(&long);
        assert!(result.contains("[... truncated at 15000 bytes]"));
    }

    #[test]
    fn test_truncate_label_reports_bytes_for_odd_boundary() {
        // One ASCII byte shifts every two-byte char off the even limit.
        let long = format!("a{}", "é".repeat(10_000));
        let result = truncate_response(&long);
        assert!(result.contains("[... truncated at 14999 bytes]"));
        assert!(result.starts_with('a'));
    }

    #[test]
    fn test_required_token_rejects_empty() {
        let err = required_token(&json!({"token": ""})).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_required_token_missing() {
        let err = required_token(&json!({})).unwrap_err();
        assert!(err.to_string().contains("token"));
    }
}
