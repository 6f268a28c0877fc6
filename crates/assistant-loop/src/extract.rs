use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use assistant_tools::ToolRequest;

/// One JSON object inside a fixed marker pair, possibly spanning lines.
/// Only the first block in a turn is considered.
static TOOL_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<tool_call>\s*(\{.*?\})\s*</tool_call>").expect("tool-call pattern compiles")
});

/// Scans a model turn for an embedded tool request. Total over all
/// inputs: no marker means no request, and a marker wrapping anything
/// that is not a JSON object also means no request. Malformed tool
/// syntax is "the model did not request a tool", never a failure.
pub fn extract_tool_call(text: &str) -> Option<ToolRequest> {
    let captures = TOOL_CALL_RE.captures(text)?;
    let payload = captures.get(1)?.as_str();

    let value: Value = serde_json::from_str(payload).ok()?;
    let object = value.as_object()?;

    let tool = object
        .get("tool")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let args = object
        .get("args")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Some(ToolRequest::new(tool, args))
}
