//! Case conversion for request payloads: clients may send camelCase keys, columns are snake_case.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// "userId" -> "user_id", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// "user_id" -> "userId"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Class-style name to table-style name: "IntegrationMember" -> "integration_member".
/// Only capitalized words count; a leading lowercase run is dropped ("getUserId" -> "user_id").
pub fn camel_to_underscore(s: &str) -> String {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"[A-Z][a-z0-9]+").expect("static regex"));
    word.find_iter(s)
        .map(|m| m.as_str().to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Rename keys of a JSON object from camelCase to snake_case (in place).
pub fn object_keys_to_snake_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let snake = to_snake_case(&k);
        if snake != k {
            if let Some(v) = obj.remove(&k) {
                obj.insert(snake, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_and_camel() {
        assert_eq!(to_snake_case("revenueShare"), "revenue_share");
        assert_eq!(to_snake_case("user_id"), "user_id");
        assert_eq!(to_camel_case("integration_id"), "integrationId");
    }

    #[test]
    fn class_names_become_table_names() {
        assert_eq!(camel_to_underscore("IntegrationMember"), "integration_member");
        assert_eq!(camel_to_underscore("Email"), "email");
        assert_eq!(camel_to_underscore("getUserId"), "user_id");
        assert_eq!(camel_to_underscore("lowercase"), "");
    }

    #[test]
    fn object_keys_are_renamed() {
        let mut v = json!({"userId": 4, "role": "EXPERT", "revenueShare": 20});
        let obj = v.as_object_mut().unwrap();
        object_keys_to_snake_case(obj);
        assert_eq!(v, json!({"user_id": 4, "role": "EXPERT", "revenue_share": 20}));
    }
}
