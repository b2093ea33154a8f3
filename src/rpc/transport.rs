//! JSON-RPC 2.0 message types exchanged over stdio.
//!
//! The server reads one request per line and writes one response per line;
//! these types are the serde shapes of those lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request or notification received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version; must be `"2.0"`.
    pub jsonrpc: String,
    /// Request identifier: a number, a string, or null. Absent (null) for
    /// notifications.
    #[serde(default)]
    pub id: Value,
    /// Method name, e.g. `tools/call`.
    pub method: String,
    /// Method parameters, if any.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and expect no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

/// A response sent back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version; always `"2.0"`.
    pub jsonrpc: String,
    /// Identifier of the request being answered.
    pub id: Value,
    /// Payload on success; omitted on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object on failure; omitted on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a successful response carrying `result`.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response with no `data`.
    pub fn error(id: Value, code: ErrorCode, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.as_i32(),
                message,
                data: None,
            }),
        }
    }

    /// Whether this response carries an error object.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric code, see [`ErrorCode`].
    pub code: i32,
    /// Short human-readable description.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The line was not valid JSON.
    ParseError,
    /// The JSON was not a valid request object.
    InvalidRequest,
    /// The method does not exist.
    MethodNotFound,
    /// Missing or malformed parameters, including unknown tools.
    InvalidParams,
    /// A failure inside the server.
    InternalError,
}

impl ErrorCode {
    /// Returns the wire value of the code.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_has_null_id() {
        let request: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(request.is_notification());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = JsonRpcResponse::error(
            json!(7),
            ErrorCode::InvalidParams,
            "missing token".to_string(),
        );
        assert!(response.is_error());
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains("-32602"));
        assert!(!text.contains("\"result\""));
    }

    #[test]
    fn test_error_codes_match_json_rpc() {
        let codes: Vec<i32> = [
            ErrorCode::ParseError,
            ErrorCode::InvalidRequest,
            ErrorCode::MethodNotFound,
            ErrorCode::InvalidParams,
            ErrorCode::InternalError,
        ]
        .iter()
        .map(|c| c.as_i32())
        .collect();
        assert_eq!(codes, vec![-32700, -32600, -32601, -32602, -32603]);
    }
}
