//! JSON error-response shaping (MODULE L), grounded on
//! `original_source/.../presentation/utils/error_formatter.py`. Every tool
//! handler funnels its `Err` path through [`format_error_response`] rather
//! than letting a `DomainError` leak into a tool result unshaped.

use serde_json::{json, Value};

use crate::error::DomainError;

/// Builds `{success:false, error:{code, message, ...context}}`. The
/// original's catch-all for anything outside the known taxonomy maps to
/// `INTERNAL_ERROR`; every variant here is already known, so that branch
/// exists only as a defensive fallback should the enum grow uncovered here.
pub fn format_error_response(err: &DomainError) -> Value {
    let mut error = json!({
        "code": err.code(),
        "message": err.to_string(),
    });

    if let Some(obj) = error.as_object_mut() {
        for (k, v) in err.context() {
            obj.insert(k, v);
        }
    }

    json!({
        "success": false,
        "error": error,
    })
}

pub fn format_success_response(payload: Value) -> Value {
    let mut body = json!({ "success": true });
    if let (Some(root), Some(extra)) = (body.as_object_mut(), payload.as_object()) {
        for (k, v) in extra {
            root.insert(k.clone(), v.clone());
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_and_value() {
        let err = DomainError::validation_with_value("origin", "bad code", "JFKX");
        let response = format_error_response(&err);
        assert_eq!(response["success"], json!(false));
        assert_eq!(response["error"]["code"], json!("VALIDATION_ERROR"));
        assert_eq!(response["error"]["field"], json!("origin"));
        assert_eq!(response["error"]["value"], json!("JFKX"));
    }

    #[test]
    fn provider_error_carries_provider_name() {
        let err = DomainError::provider("kiwi", "back-end returned 500");
        let response = format_error_response(&err);
        assert_eq!(response["error"]["code"], json!("PROVIDER_ERROR"));
        assert_eq!(response["error"]["provider"], json!("kiwi"));
    }

    #[test]
    fn success_response_merges_payload_fields() {
        let response = format_success_response(json!({"cache": {"size": 3}}));
        assert_eq!(response["success"], json!(true));
        assert_eq!(response["cache"]["size"], json!(3));
    }
}
