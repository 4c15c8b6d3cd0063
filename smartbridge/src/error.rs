use serde_json::Value;
use thiserror::Error;
use wyze_api::{ApiError, VendorFault};

use crate::property::Family;

#[derive(Error, Debug)]
pub enum SmartbridgeError {
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("Authentication failure ({0})")]
    AuthenticationFailure(VendorFault),

    #[error("Protocol mismatch ({0})")]
    ProtocolMismatch(VendorFault),

    #[error("Vendor internal failure ({0})")]
    VendorInternalFailure(VendorFault),

    /// Wrong type, or a name the device family does not know
    #[error("Invalid parameter '{parameter}': {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Right type, outside the accepted range or set
    #[error("Invalid value for '{parameter}': {value}")]
    InvalidValue { parameter: String, value: String },

    #[error("A {family} does not support {capability}")]
    UnsupportedCapability {
        family: Family,
        capability: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(ApiError),
}

impl SmartbridgeError {
    pub fn invalid_parameter(parameter: &str, value: &Value) -> Self {
        SmartbridgeError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: &Value) -> Self {
        SmartbridgeError::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    /// The vendor envelope behind a vendor-classified failure
    pub fn fault(&self) -> Option<&VendorFault> {
        match self {
            SmartbridgeError::AuthenticationFailure(fault)
            | SmartbridgeError::ProtocolMismatch(fault)
            | SmartbridgeError::VendorInternalFailure(fault) => Some(fault),
            SmartbridgeError::Api(error) => error.fault(),
            _ => None,
        }
    }

    /// `true` for failures raised before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SmartbridgeError::InvalidParameter { .. } | SmartbridgeError::InvalidValue { .. }
        )
    }
}

impl From<ApiError> for SmartbridgeError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::ConnectionFailure(msg) => SmartbridgeError::ConnectionFailure(msg),
            ApiError::UnexpectedPayload(msg) => SmartbridgeError::UnexpectedPayload(msg),
            ApiError::AuthenticationFailure(fault) => SmartbridgeError::AuthenticationFailure(fault),
            ApiError::ProtocolMismatch(fault) => SmartbridgeError::ProtocolMismatch(fault),
            ApiError::VendorInternalFailure(fault) => SmartbridgeError::VendorInternalFailure(fault),
            ApiError::UnknownApplication(app_id) => {
                SmartbridgeError::Config(format!("no signing salt for application id '{}'", app_id))
            }
            other => SmartbridgeError::Api(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartbridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fault(code: &str) -> VendorFault {
        VendorFault {
            code: code.to_string(),
            message: Some("AccessTokenError".to_string()),
            body: json!({"code": code, "msg": "AccessTokenError"}),
        }
    }

    #[test]
    fn test_api_error_kinds_are_kept() {
        let error: SmartbridgeError = ApiError::AuthenticationFailure(fault("2001")).into();
        assert!(matches!(error, SmartbridgeError::AuthenticationFailure(_)));
        assert_eq!(error.fault().map(|f| f.code.as_str()), Some("2001"));

        let error: SmartbridgeError = ApiError::UnknownApplication("nope".into()).into();
        assert!(matches!(error, SmartbridgeError::Config(_)));

        let error: SmartbridgeError = ApiError::MissingCredentials("refresh_token").into();
        assert!(matches!(error, SmartbridgeError::Api(ApiError::MissingCredentials(_))));
    }

    #[test]
    fn test_validation_errors_name_parameter_and_value() {
        let error = SmartbridgeError::invalid_value("brightness", &json!(101));
        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Invalid value for 'brightness': 101");

        let error = SmartbridgeError::UnsupportedCapability {
            family: Family::Vacuum,
            capability: "ssid",
        };
        assert_eq!(error.to_string(), "A vacuum does not support ssid");
    }
}
