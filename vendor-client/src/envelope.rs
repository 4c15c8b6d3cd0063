//! The vendor's `{code, msg, data}` response envelope
//!
//! The envelope is not under our control, so it is read loosely: `code` may
//! be a number or a string, and every field may be missing.

use std::fmt;

use serde_json::Value;
use tracing::{error, warn};

use crate::{Result, TransportError};

/// Code the vendor uses for a successful call
pub const SUCCESS_CODE: &str = "1";

/// Messages that mean the credentials were refused
const AUTHENTICATION_MESSAGES: &[&str] = &["AccessTokenError", "UserIsLocked", "UserNameOrPasswordError"];

/// Codes that mean the credentials were refused
const AUTHENTICATION_CODES: &[&str] = &["2001"];

/// Codes that mean the request shape or signature is wrong
const PROTOCOL_MISMATCH_CODES: &[&str] = &["1001", "1003", "1004"];

/// A failed envelope, kept verbatim for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct VendorFault {
    pub code: String,
    pub message: Option<String>,
    pub body: Value,
}

impl fmt::Display for VendorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "code {}: {}", self.code, msg),
            None => write!(f, "code {}", self.code),
        }
    }
}

/// Parsed vendor response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Business code, normalized to a string
    pub code: Option<String>,
    /// Optional `msg` field
    pub message: Option<String>,
    /// Optional `data` payload; `null` is treated as absent
    pub data: Option<Value>,
    /// The whole response body
    pub raw: Value,
}

impl ResponseEnvelope {
    /// Parse a response body into an envelope
    pub fn parse(body: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(body)
            .map_err(|e| TransportError::UnexpectedPayload(format!("response is not JSON: {}", e)))?;
        Self::from_value(raw)
    }

    /// Build an envelope from an already parsed JSON document
    pub fn from_value(raw: Value) -> Result<Self> {
        let object = raw.as_object().ok_or_else(|| {
            TransportError::UnexpectedPayload(format!("response is not a JSON object: {}", raw))
        })?;

        let code = object.get("code").and_then(normalize_code);
        let message = object.get("msg").and_then(Value::as_str).map(str::to_string);
        let data = object.get("data").filter(|d| !d.is_null()).cloned();

        Ok(Self { code, message, data, raw })
    }

    /// `true` when `code` is absent or equal to `"1"`
    pub fn is_success(&self) -> bool {
        match self.code.as_deref() {
            None => true,
            Some(code) => code == SUCCESS_CODE,
        }
    }

    /// Turn a non-success envelope into the matching error kind
    pub fn classify(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let fault = self.into_fault();
        let code = fault.code.as_str();
        let message = fault.message.as_deref().unwrap_or_default();

        if AUTHENTICATION_MESSAGES.contains(&message) || AUTHENTICATION_CODES.contains(&code) {
            warn!(code, message, "vendor refused the credentials");
            return Err(TransportError::Authentication(fault));
        }

        if PROTOCOL_MISMATCH_CODES.contains(&code) {
            error!(code, body = %fault.body, "request does not fit the vendor endpoint");
            return Err(TransportError::ProtocolMismatch(fault));
        }

        error!(code, body = %fault.body, "vendor reported a failure");
        Err(TransportError::VendorInternal(fault))
    }

    fn into_fault(self) -> VendorFault {
        VendorFault {
            code: self.code.unwrap_or_default(),
            message: self.message,
            body: self.raw,
        }
    }
}

fn normalize_code(code: &Value) -> Option<String> {
    match code {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_success_returns_data_unchanged() {
        let body = r#"{"code":"1","msg":"","data":{"device_list":[{"mac":"AA"}]}}"#;
        let envelope = ResponseEnvelope::parse(body).unwrap().classify().unwrap();

        assert_eq!(envelope.data, Some(json!({"device_list": [{"mac": "AA"}]})));
    }

    #[test]
    fn test_missing_code_is_success() {
        let envelope = ResponseEnvelope::parse(r#"{"access_token":"abc"}"#).unwrap();
        assert!(envelope.is_success());
        assert!(envelope.classify().is_ok());
    }

    #[test]
    fn test_numeric_code_is_normalized() {
        let envelope = ResponseEnvelope::parse(r#"{"code":1}"#).unwrap();
        assert_eq!(envelope.code.as_deref(), Some("1"));

        let envelope = ResponseEnvelope::parse(r#"{"code":1004}"#).unwrap();
        assert_eq!(envelope.code.as_deref(), Some("1004"));
    }

    #[test]
    fn test_null_data_is_absent() {
        let envelope = ResponseEnvelope::parse(r#"{"code":"1","data":null}"#).unwrap();
        assert_eq!(envelope.data, None);
    }

    #[rstest]
    #[case(r#"{"code":"2001","msg":"AccessTokenError"}"#)]
    #[case(r#"{"code":"2000","msg":"UserIsLocked"}"#)]
    #[case(r#"{"code":"3000","msg":"UserNameOrPasswordError"}"#)]
    #[case(r#"{"code":2001}"#)]
    fn test_authentication_failures(#[case] body: &str) {
        let result = ResponseEnvelope::parse(body).unwrap().classify();
        assert!(matches!(result, Err(TransportError::Authentication(_))));
    }

    #[rstest]
    #[case(r#"{"code":"1001"}"#)]
    #[case(r#"{"code":"1003","msg":"bad params"}"#)]
    #[case(r#"{"code":"1004"}"#)]
    fn test_protocol_mismatch(#[case] body: &str) {
        let result = ResponseEnvelope::parse(body).unwrap().classify();
        assert!(matches!(result, Err(TransportError::ProtocolMismatch(_))));
    }

    #[test]
    fn test_other_codes_are_vendor_internal_and_keep_envelope() {
        let result = ResponseEnvelope::parse(r#"{"code":"5000","msg":"ServerBusy"}"#)
            .unwrap()
            .classify();

        match result {
            Err(TransportError::VendorInternal(fault)) => {
                assert_eq!(fault.code, "5000");
                assert_eq!(fault.message.as_deref(), Some("ServerBusy"));
                assert_eq!(fault.body, json!({"code": "5000", "msg": "ServerBusy"}));
                assert_eq!(fault.to_string(), "code 5000: ServerBusy");
            }
            other => panic!("Expected VendorInternal, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_is_unexpected_payload() {
        let result = ResponseEnvelope::parse("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(TransportError::UnexpectedPayload(_))));
    }

    #[test]
    fn test_non_object_json_is_unexpected_payload() {
        let result = ResponseEnvelope::parse("[1, 2, 3]");
        assert!(matches!(result, Err(TransportError::UnexpectedPayload(_))));
    }
}
