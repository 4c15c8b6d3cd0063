//! Error types for the vendor transport

use thiserror::Error;

use crate::envelope::VendorFault;

/// Errors that can occur while talking to the vendor cloud
#[derive(Debug, Error)]
pub enum TransportError {
    /// Timeout, DNS, TLS or a non-2xx status without a usable envelope
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    /// The vendor answered, but not with a JSON envelope
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// Invalid or expired credentials, locked account, bad username/password
    #[error("Authentication rejected by vendor ({0})")]
    Authentication(VendorFault),

    /// Parameters or signature do not fit the endpoint
    #[error("Request does not fit the endpoint ({0})")]
    ProtocolMismatch(VendorFault),

    /// Any other non-success business code
    #[error("Vendor service failure ({0})")]
    VendorInternal(VendorFault),
}

impl TransportError {
    /// The preserved vendor envelope, for failures the vendor classified
    pub fn fault(&self) -> Option<&VendorFault> {
        match self {
            TransportError::Authentication(fault)
            | TransportError::ProtocolMismatch(fault)
            | TransportError::VendorInternal(fault) => Some(fault),
            TransportError::ConnectionFailure(_) | TransportError::UnexpectedPayload(_) => None,
        }
    }
}
