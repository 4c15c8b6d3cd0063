use thiserror::Error;
use vendor_client::{TransportError, VendorFault};

/// High-level API errors for Wyze operations
///
/// Vendor-classified failures keep the original envelope so callers can log
/// the exact code and message the cloud returned.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Timeout, DNS, TLS or an HTTP error without a usable body
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// The vendor answered with something that is not the expected shape
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// Invalid or expired token, locked account, wrong username/password
    ///
    /// Never retried here: retrying with the same stale token loops.
    #[error("Authentication failure ({0})")]
    AuthenticationFailure(VendorFault),

    /// Request parameters or signature do not fit the endpoint
    ///
    /// This points at a bug or a misconfiguration in the caller, not at
    /// bad credentials.
    #[error("Protocol mismatch ({0})")]
    ProtocolMismatch(VendorFault),

    /// Any other non-success business code; safe to retry with backoff
    #[error("Vendor internal failure ({0})")]
    VendorInternalFailure(VendorFault),

    /// No signing salt is known for this application id
    #[error("Unknown application id '{0}': no signing salt configured")]
    UnknownApplication(String),

    /// An operation needs a credential the session does not hold
    #[error("Missing credential: {0}")]
    MissingCredentials(&'static str),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The HMAC key could not be initialised
    #[error("Signing error: {0}")]
    Signing(String),
}

impl ApiError {
    /// The preserved vendor envelope, if the vendor classified this failure
    pub fn fault(&self) -> Option<&VendorFault> {
        match self {
            ApiError::AuthenticationFailure(fault)
            | ApiError::ProtocolMismatch(fault)
            | ApiError::VendorInternalFailure(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::ConnectionFailure(msg) => ApiError::ConnectionFailure(msg),
            TransportError::UnexpectedPayload(msg) => ApiError::UnexpectedPayload(msg),
            TransportError::Authentication(fault) => ApiError::AuthenticationFailure(fault),
            TransportError::ProtocolMismatch(fault) => ApiError::ProtocolMismatch(fault),
            TransportError::VendorInternal(fault) => ApiError::VendorInternalFailure(fault),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Serialization(error.to_string())
    }
}
