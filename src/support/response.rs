use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

/// Pretty-printed JSON text
pub fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
}

/// Wrap a normalized result as the single text block of a successful tool call
pub fn success_json_response(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(to_pretty_json(value))])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pretty_json_is_indented() {
        let text = to_pretty_json(&json!({ "count": 1 }));
        assert_eq!(text, "{\n  \"count\": 1\n}");
    }

    #[test]
    fn test_success_response_has_one_text_block() {
        let result = success_json_response(&json!({ "campaigns": [] }));
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.is_error, Some(false));
    }
}
