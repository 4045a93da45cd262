use reqwest::StatusCode;
use serde_json::Value;

/// Best-effort human readable detail from a failed API response body.
///
/// `detail`, `message` and `error` string fields are tried in that order. Any other
/// JSON object is treated as field validation errors and rendered as
/// `field: msg1, msg2; other: msg`. Bodies that are not JSON fall back to the status line.
pub fn extract_error_detail(status: StatusCode, body: &str) -> String {
    let fallback = || {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    };

    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    for key in ["detail", "message", "error"] {
        if let Some(Value::String(msg)) = fields.get(key) {
            return msg.clone();
        }
    }

    let messages: Vec<String> = fields
        .iter()
        .map(|(field, value)| match value {
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(render_value).collect();
                format!("{}: {}", field, parts.join(", "))
            }
            other => format!("{}: {}", field, render_value(other)),
        })
        .collect();

    if messages.is_empty() {
        fallback()
    } else {
        messages.join("; ")
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_detail_then_message_then_error() {
        let body = r#"{"error": "third", "message": "second", "detail": "first"}"#;
        assert_eq!(extract_error_detail(StatusCode::BAD_REQUEST, body), "first");

        let body = r#"{"error": "third", "message": "second"}"#;
        assert_eq!(extract_error_detail(StatusCode::BAD_REQUEST, body), "second");

        let body = r#"{"error": "Slot already taken"}"#;
        assert_eq!(extract_error_detail(StatusCode::CONFLICT, body), "Slot already taken");
    }

    #[test]
    fn renders_field_errors() {
        let body = r#"{"doctor": ["This field is required."], "date": "Invalid date"}"#;
        assert_eq!(
            extract_error_detail(StatusCode::BAD_REQUEST, body),
            "date: Invalid date; doctor: This field is required."
        );
    }

    #[test]
    fn non_json_body_uses_status_line() {
        assert_eq!(
            extract_error_detail(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "HTTP 500: Internal Server Error"
        );
        assert_eq!(
            extract_error_detail(StatusCode::BAD_GATEWAY, "{}"),
            "HTTP 502: Bad Gateway"
        );
    }
}
