use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel all device-info methods are served on.
pub const CHANNEL: &str = "device_info";

/// Error code for any top-level failure.
pub const ERROR_CODE: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            arguments: Value::Null,
        }
    }

    pub fn with_arguments(method: &str, arguments: Value) -> Self {
        Self {
            method: method.to_string(),
            arguments,
        }
    }

    /// Optional boolean argument. Absent or `null` is `Ok(None)`; any other
    /// non-boolean value is an error.
    pub fn bool_argument(&self, name: &'static str) -> Result<Option<bool>, String> {
        match self.arguments.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(format!("expected a boolean, got {}", other)),
        }
    }
}

/// Exactly one of these is produced per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default)]
        details: Value,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: Value) -> Self {
        MethodResponse::Success { result }
    }

    pub fn error(message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: ERROR_CODE.to_string(),
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            MethodResponse::Success { result } => Some(result),
            _ => None,
        }
    }
}

/// One request line on the stdio transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(flatten)]
    pub call: MethodCall,
}

fn default_channel() -> String {
    CHANNEL.to_string()
}

/// One reply line, tagged with the request id it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyFrame {
    pub id: u64,
    #[serde(flatten)]
    pub response: MethodResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_frame_parses_with_defaults() {
        let frame: RequestFrame =
            serde_json::from_str(r#"{"id": 7, "method": "getSoundProfile"}"#).unwrap();
        assert_eq!(frame.id, 7);
        assert_eq!(frame.channel, CHANNEL);
        assert_eq!(frame.call.method, "getSoundProfile");
        assert_eq!(frame.call.arguments, Value::Null);
    }

    #[test]
    fn test_reply_frame_shapes() {
        let ok = ReplyFrame { id: 1, response: MethodResponse::success(json!(true)) };
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"id": 1, "status": "success", "result": true}));

        let err = ReplyFrame { id: 2, response: MethodResponse::error("boom") };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"id": 2, "status": "error", "code": "ERROR", "message": "boom", "details": null})
        );

        let ni = ReplyFrame { id: 3, response: MethodResponse::NotImplemented };
        assert_eq!(serde_json::to_value(&ni).unwrap(), json!({"id": 3, "status": "notImplemented"}));
    }

    #[test]
    fn test_bool_argument() {
        let call = MethodCall::with_arguments("x", json!({"includeSystemApps": false}));
        assert_eq!(call.bool_argument("includeSystemApps"), Ok(Some(false)));
        assert_eq!(MethodCall::new("x").bool_argument("includeSystemApps"), Ok(None));
        let bad = MethodCall::with_arguments("x", json!({"includeSystemApps": "no"}));
        assert!(bad.bool_argument("includeSystemApps").is_err());
    }
}
