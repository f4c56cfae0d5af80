use serde_json::{Map, Value};

/// `{"<field>": "<text>"}`
pub fn json_body(field: &str, text: &str) -> Value {
    let mut body = Map::new();
    body.insert(field.to_string(), Value::String(text.to_string()));
    Value::Object(body)
}

/// Single-pair body for the form-url-encoded retry.
pub fn form_body<'a>(field: &'a str, text: &'a str) -> [(&'a str, &'a str); 1] {
    [(field, text)]
}

/// Picks the reply out of a JSON response.
///
/// The first field in `fields` holding a non-empty value wins. Strings are
/// taken as-is, other values as compact JSON. When nothing matches, the
/// whole document is returned compactly serialized.
pub fn extract_reply(data: &Value, fields: &[String]) -> String {
    fields
        .iter()
        .filter_map(|f| data.get(f.as_str()))
        .find_map(non_empty_text)
        .unwrap_or_else(|| data.to_string())
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// True when a `Content-Type` header value names JSON.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> Vec<String> {
        ["reply", "message", "response", "text"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn body_uses_configured_field() {
        assert_eq!(json_body("message", "hello").to_string(), r#"{"message":"hello"}"#);
        assert_eq!(json_body("q", "hi"), json!({"q": "hi"}));
    }

    #[test]
    fn preference_order_is_respected() {
        let data = json!({"text": "t", "response": "r", "message": "m"});
        assert_eq!(extract_reply(&data, &defaults()), "m");
        let data = json!({"text": "t", "reply": "first"});
        assert_eq!(extract_reply(&data, &defaults()), "first");
    }

    #[test]
    fn empty_and_falsy_values_are_skipped() {
        let data = json!({"reply": "", "message": null, "response": 0, "text": "fine"});
        assert_eq!(extract_reply(&data, &defaults()), "fine");
        let data = json!({"reply": false, "message": 42});
        assert_eq!(extract_reply(&data, &defaults()), "42");
    }

    #[test]
    fn unmatched_document_is_serialized_whole() {
        let data = json!({"answer": "x"});
        assert_eq!(extract_reply(&data, &defaults()), r#"{"answer":"x"}"#);
        let data = json!(["a", "b"]);
        assert_eq!(extract_reply(&data, &defaults()), r#"["a","b"]"#);
    }

    #[test]
    fn nested_values_become_json_text() {
        let data = json!({"reply": {"parts": [1, 2]}});
        assert_eq!(extract_reply(&data, &defaults()), r#"{"parts":[1,2]}"#);
    }

    #[test]
    fn content_type_detection() {
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type(""));
    }
}
