use serde_json::Value;

const MASK: &str = "********";
const EMAIL_MASK: &str = "********@*****.com";

/// Masks sensitive fields in JSON payloads before they are logged.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = match sensitivity(key) {
                    Some(mask) if !val.is_object() && !val.is_array() => {
                        Value::String(mask.to_string())
                    }
                    _ => sanitize_json(val),
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn sensitivity(key: &str) -> Option<&'static str> {
    match key.to_ascii_lowercase().as_str() {
        "password" | "secret" | "token" | "api_key" | "authorization" => Some(MASK),
        "email" => Some(EMAIL_MASK),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_fields_pass_through() {
        let input = json!({
            "account_id": "acc123",
            "amount": "100.00"
        });

        assert_eq!(sanitize_json(&input), input);
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "user": {
                "Token": "abc",
                "email": "someone@example.org",
                "name": "John"
            },
            "items": [{"password": "hunter2"}]
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["user"]["Token"], MASK);
        assert_eq!(sanitized["user"]["email"], EMAIL_MASK);
        assert_eq!(sanitized["user"]["name"], "John");
        assert_eq!(sanitized["items"][0]["password"], MASK);
    }
}
