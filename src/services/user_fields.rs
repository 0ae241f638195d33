// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile edits for `PUT /users`.

use crate::error::FieldError;
use crate::models::mutation::{FieldUpdate, FieldValue};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

const NAME_FIELDS: [&str; 2] = ["first_name", "last_name"];

/// Characters removed from personal names. `0` is deliberately not in the set.
static NAME_STRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[ 1-9.?!{}()\[\]\-+;=*&%$#@,":']"#)
        .expect("valid name strip pattern")
});

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserMutation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Request body of `PUT /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEditRequest {
    #[serde(default)]
    pub field: Option<RawUserMutation>,
}

/// Validate and sanitize a profile edit for the authenticated user.
pub fn sanitize_user_edit(
    user_id: u64,
    request: &UserEditRequest,
) -> Result<FieldUpdate, FieldError> {
    let raw = request
        .field
        .as_ref()
        .ok_or_else(|| FieldError::MissingRequiredFields("field".to_string()))?;

    let name = raw
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| FieldError::MissingRequiredFields("name".to_string()))?;
    let value = raw
        .value
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or_else(|| FieldError::MissingRequiredFields("value".to_string()))?;

    if NAME_FIELDS.contains(&name) {
        let text = value
            .as_str()
            .ok_or_else(|| FieldError::shape(name, "a string"))?;
        return Ok(FieldUpdate::for_user(
            user_id,
            name,
            FieldValue::Text(strip_name(text)),
        ));
    }

    Ok(FieldUpdate::for_user(
        user_id,
        name,
        FieldValue::from_json(value.clone()),
    ))
}

pub fn strip_name(name: &str) -> String {
    NAME_STRIP.replace_all(name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(name: &str, value: Value) -> UserEditRequest {
        UserEditRequest {
            field: Some(RawUserMutation {
                name: Some(name.to_string()),
                value: Some(value),
            }),
        }
    }

    #[test]
    fn test_strip_name() {
        assert_eq!(strip_name("Jo hn3!"), "John");
        assert_eq!(strip_name("O'Brien-Smith"), "OBrienSmith");
        assert_eq!(strip_name("[Zoe] (x)"), "Zoex");
        assert_eq!(strip_name("Agent 007"), "Agent00");
    }

    #[test]
    fn test_first_name_sanitized() {
        let update = sanitize_user_edit(7, &request("first_name", json!("Jo hn3!"))).unwrap();
        assert_eq!(update.name, "first_name");
        assert_eq!(update.value, FieldValue::Text("John".to_string()));
        assert_eq!(update, FieldUpdate::for_user(7, "first_name", FieldValue::Text("John".into())));
    }

    #[test]
    fn test_other_fields_pass_through() {
        let update = sanitize_user_edit(7, &request("bio", json!("Skier, 3 kids!"))).unwrap();
        assert_eq!(update.value, FieldValue::Text("Skier, 3 kids!".to_string()));

        let update = sanitize_user_edit(7, &request("email_opt_out", json!(true))).unwrap();
        assert_eq!(update.value, FieldValue::Bool(true));
    }

    #[test]
    fn test_name_must_be_text() {
        let err = sanitize_user_edit(7, &request("last_name", json!(42))).unwrap_err();
        assert!(matches!(err, FieldError::InvalidFieldShape { .. }));
    }

    #[test]
    fn test_missing_members() {
        assert_eq!(
            sanitize_user_edit(7, &UserEditRequest::default()).unwrap_err(),
            FieldError::MissingRequiredFields("field".to_string())
        );
        assert_eq!(
            sanitize_user_edit(7, &request("bio", Value::Null)).unwrap_err(),
            FieldError::MissingRequiredFields("value".to_string())
        );
    }
}
