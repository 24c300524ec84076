use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Response envelope shared by every /api endpoint.
///
/// The `statusCode` field carries the operation outcome and may differ from
/// the transport status (delete reports 204 in a 200 response).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub is_success: bool,
    pub error_messages: Vec<String>,
    pub result: Value,
}

impl ApiResponse {
    /// 200 envelope with a serialized payload.
    pub fn ok<T: Serialize>(result: T) -> Self {
        Self::success(StatusCode::OK, result)
    }

    /// 200 envelope with no payload.
    pub fn ok_empty() -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            is_success: true,
            error_messages: Vec::new(),
            result: Value::Null,
        }
    }

    /// 201 envelope with the created payload.
    pub fn created<T: Serialize>(result: T) -> Self {
        Self::success(StatusCode::CREATED, result)
    }

    /// 204 envelope with no payload.
    pub fn no_content() -> Self {
        Self {
            status_code: StatusCode::NO_CONTENT.as_u16(),
            is_success: true,
            error_messages: Vec::new(),
            result: Value::Null,
        }
    }

    /// 400 envelope with a single message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::bad_request(vec![message.into()])
    }

    /// 400 envelope with one or more messages.
    pub fn bad_request(messages: Vec<String>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            is_success: false,
            error_messages: messages,
            result: Value::Null,
        }
    }

    fn success<T: Serialize>(status: StatusCode, result: T) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: true,
            error_messages: Vec::new(),
            result: serde_json::to_value(result).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(json!({"key": "value"}));
        assert_eq!(response.status_code, 200);
        assert!(response.is_success);
        assert!(response.error_messages.is_empty());
        assert_eq!(response.result["key"], "value");
    }

    #[test]
    fn test_ok_empty_has_null_result() {
        let response = ApiResponse::ok_empty();
        assert_eq!(response.status_code, 200);
        assert!(response.is_success);
        assert!(response.result.is_null());
    }

    #[test]
    fn test_no_content_keeps_success() {
        let response = ApiResponse::no_content();
        assert_eq!(response.status_code, 204);
        assert!(response.is_success);
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::error("Id cannot be 0");
        assert_eq!(response.status_code, 400);
        assert!(!response.is_success);
        assert_eq!(response.error_messages, vec!["Id cannot be 0".to_string()]);
        assert!(response.result.is_null());
    }

    #[test]
    fn test_serializes_camel_case() {
        let response = ApiResponse::ok_empty();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"statusCode\""));
        assert!(json.contains("\"isSuccess\""));
        assert!(json.contains("\"errorMessages\""));
        assert!(json.contains("\"result\""));
    }
}
