//! Type-safe client for the Wyze cloud services
//!
//! This crate speaks the vendor's five HTTP services (auth, platform, venus,
//! general and the legacy device API). It owns request signing and payload
//! decoration; transport and envelope classification live in
//! `vendor-client`.
//!
//! # Operations
//!
//! Every endpoint is a zero-sized operation type implementing
//! [`WyzeOperation`]. [`WyzeClient::execute`] routes it to the right
//! service, signs it with the current session and parses the response:
//!
//! ```rust,ignore
//! use wyze_api::{AppInfo, WyzeClient};
//! use wyze_api::operations::{GetIotPropOperation, GetIotPropOperationRequest};
//!
//! let client = WyzeClient::new(AppInfo::new("phone-id"));
//! client.login("user@example.com", "password")?;
//!
//! let props = client.execute::<GetIotPropOperation>(&GetIotPropOperationRequest {
//!     did: "JA_RO2_ABCDEF".to_string(),
//!     keys: vec!["battary".to_string(), "mode".to_string()],
//! })?;
//! ```
//!
//! Most callers use the convenience methods on [`WyzeClient`] instead.

mod client;
mod credentials;
mod error;
mod operation;
mod service;
mod service_client;

pub mod operations;
pub mod signature;

pub use client::{WyzeClient, WyzeClientBuilder};
pub use credentials::{AppInfo, Credentials, DEFAULT_APP_ID, DEFAULT_APP_VERSION};
pub use error::{ApiError, Result};
pub use operation::{Payload, RequestContext, WyzeOperation};
pub use service::{Service, ServiceInfo, SigningVariant, VENUS_APP_ID};
pub use service_client::ServiceClient;

pub use vendor_client::{
    HeaderSet, HttpTransport, Method, OutboundRequest, RequestBody, ResponseEnvelope, Transport,
    TransportConfig, TransportError, VendorFault,
};
