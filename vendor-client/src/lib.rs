//! Private HTTP transport for the vendor cloud API
//!
//! This crate provides the minimal blocking transport used by the smartbridge
//! service clients: it sends one request, parses the vendor's JSON envelope
//! and classifies its business code into a typed failure. Nothing here
//! retries; a vacuum "clean" sent twice is not the same as once.

mod envelope;
mod error;
mod request;

pub use envelope::{ResponseEnvelope, VendorFault, SUCCESS_CODE};
pub use error::TransportError;
pub use request::{HeaderSet, Method, OutboundRequest, RequestBody};

use std::sync::OnceLock;
use std::time::Duration;

use tracing::{debug, trace};

/// Result alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// The seam between service clients and the network
pub trait Transport: Send + Sync {
    /// Send one request and return the classified envelope
    fn send(&self, request: &OutboundRequest) -> Result<ResponseEnvelope>;
}

/// Timeouts for the HTTP agent
///
/// Both default to `None`: a hung endpoint blocks the caller until the
/// operating system gives up, which matches the vendor app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportConfig {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

/// Blocking transport backed by a connection-reusing `ureq` agent
///
/// The agent is created on the first request and kept for the lifetime of
/// the transport, so one `HttpTransport` per service gives one pool per
/// service.
#[derive(Debug, Default)]
pub struct HttpTransport {
    config: TransportConfig,
    agent: OnceLock<ureq::Agent>,
}

impl HttpTransport {
    /// Create a transport with no timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with explicit timeouts
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            agent: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn agent(&self) -> &ureq::Agent {
        self.agent.get_or_init(|| {
            let mut builder = ureq::AgentBuilder::new();
            if let Some(timeout) = self.config.connect_timeout {
                builder = builder.timeout_connect(timeout);
            }
            if let Some(timeout) = self.config.read_timeout {
                builder = builder.timeout_read(timeout);
            }
            builder.build()
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &OutboundRequest) -> Result<ResponseEnvelope> {
        debug!(method = %request.method, url = %request.url, "sending vendor request");
        trace!(headers = ?request.headers, body = ?request.body, "vendor request");

        let mut call = self.agent().request(request.method.as_str(), &request.url);
        for (name, value) in request.headers.iter() {
            call = call.set(name, value);
        }

        let result = match &request.body {
            RequestBody::Empty => call.call(),
            RequestBody::Query(params) => {
                for (key, value) in params {
                    call = call.query(key, value);
                }
                call.call()
            }
            RequestBody::Json(body) => {
                if !request.headers.contains("content-type") {
                    call = call.set("content-type", "application/json; charset=utf-8");
                }
                call.send_string(body)
            }
        };

        match result {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| TransportError::ConnectionFailure(e.to_string()))?;
                trace!(%body, "vendor response");
                ResponseEnvelope::parse(&body)?.classify()
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                match ResponseEnvelope::parse(&body) {
                    Ok(envelope) if envelope.code.is_some() && !envelope.is_success() => {
                        envelope.classify()
                    }
                    _ => Err(TransportError::ConnectionFailure(format!(
                        "HTTP {} from {}",
                        status, request.url
                    ))),
                }
            }
            Err(ureq::Error::Transport(e)) => Err(TransportError::ConnectionFailure(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new();
        assert_eq!(transport.config(), &TransportConfig::default());
        assert!(transport.agent.get().is_none());
    }

    #[test]
    fn test_agent_is_created_once() {
        let transport = HttpTransport::with_config(TransportConfig {
            connect_timeout: Some(Duration::from_secs(5)),
            read_timeout: Some(Duration::from_secs(10)),
        });

        let first = transport.agent() as *const ureq::Agent;
        let second = transport.agent() as *const ureq::Agent;
        assert_eq!(first, second);
    }
}
