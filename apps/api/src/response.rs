//! Standard JSON response envelope.
//!
//! Every endpoint responds with the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... } }
//! { "success": true,  "count": 3, "data": [ ... ] }
//! { "success": true,  "message": "Product removed" }
//! { "success": false, "message": "Product not found: abc123" }
//! ```

use serde::Serialize;

// =============================================================================
// Response Envelope
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    /// Number of items in `data`. Only present on list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data: Some(data),
            message: None,
        }
    }

    /// Successful list response with an item count alongside the payload.
    pub fn success_with_count(data: T, count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            data: Some(data),
            message: None,
        }
    }

    /// Successful response carrying only a human-readable message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Failed response with an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("count").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_list_envelope_includes_count() {
        let resp = ApiResponse::success_with_count(vec!["a", "b"], 2);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["count"], 2);
    }

    #[test]
    fn test_error_envelope() {
        let resp: ApiResponse<()> = ApiResponse::error("boom");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "boom");
        assert!(json.get("data").is_none());
    }
}
