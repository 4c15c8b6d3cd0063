//! Per-service request preparation
//!
//! A [`ServiceClient`] owns one service's base URL, its persistent headers
//! and its transport. It turns an operation's payload into a wire request:
//! it adds the nonce, decorates the body and signs the exact bytes that are
//! sent.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use vendor_client::{HeaderSet, Method, OutboundRequest, RequestBody, Transport};

use crate::credentials::{AppInfo, Credentials};
use crate::error::Result;
use crate::operation::{query_value, Payload, RequestContext, WyzeOperation};
use crate::service::{Service, ServiceInfo, SigningVariant};
use crate::signature::{family_salt, request_id, signature, sorted_query, Nonce};

/// Client for a single Wyze service
pub struct ServiceClient {
    service: Service,
    info: ServiceInfo,
    app: AppInfo,
    app_id: String,
    base_url: String,
    headers: HeaderSet,
    transport: Arc<dyn Transport>,
}

impl ServiceClient {
    pub fn new(
        service: Service,
        app: AppInfo,
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            service,
            info: service.info(),
            app_id: service.app_id(&app),
            headers: service.headers(&app),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app,
            transport,
        }
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request; per-request headers are layered on a copy
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Prepare, send and parse one operation
    pub fn execute<Op: WyzeOperation>(
        &self,
        request: &Op::Request,
        credentials: &Credentials,
    ) -> Result<Op::Response> {
        debug_assert_eq!(Op::SERVICE, self.service);

        let outbound = self.prepare::<Op>(request, credentials, &Nonce::now())?;
        debug!(service = self.info.name, path = Op::PATH, "executing operation");

        let envelope = self.transport.send(&outbound)?;
        Op::parse_response(envelope)
    }

    /// Build the wire request for an operation without sending it
    pub fn prepare<Op: WyzeOperation>(
        &self,
        request: &Op::Request,
        credentials: &Credentials,
        nonce: &Nonce,
    ) -> Result<OutboundRequest> {
        let context = RequestContext {
            nonce,
            app: &self.app,
            credentials,
        };
        let mut payload = Op::build_payload(request, &context);
        let mut request_headers = HeaderSet::new();

        let body = match self.info.signing {
            SigningVariant::Dynamic => {
                payload.insert("nonce".to_string(), json!(nonce.as_str()));
                let salt = family_salt(&self.app_id)?;
                let token = credentials.access_token.as_deref();

                let body = encode_body(Op::METHOD, payload)?;
                let message = match &body {
                    RequestBody::Query(params) => sorted_query(params),
                    RequestBody::Json(json) => json.clone(),
                    RequestBody::Empty => String::new(),
                };

                if let Some(token) = token {
                    request_headers.insert("access_token", token);
                }
                request_headers.insert("requestid", request_id(nonce));
                request_headers.insert("signature2", signature(&message, token, salt)?);
                body
            }
            SigningVariant::Legacy { sc, app_name } => {
                payload.insert("access_token".to_string(), json!(credentials.access_token));
                payload.insert("app_name".to_string(), json!(app_name));
                payload.insert(
                    "app_ver".to_string(),
                    json!(format!("{}___{}", app_name, self.app.app_version)),
                );
                payload.insert("app_version".to_string(), json!(self.app.app_version));
                payload.insert("phone_id".to_string(), json!(self.app.phone_id));
                payload.insert("sc".to_string(), json!(sc));
                payload.insert(
                    "ts".to_string(),
                    json!((nonce.as_millis() / 1000).to_string()),
                );
                encode_body(Op::METHOD, payload)?
            }
            SigningVariant::Unsigned => {
                payload.insert("apiKey".to_string(), json!(""));
                payload.insert("appId".to_string(), json!(self.app_id));
                payload.insert("appVersion".to_string(), json!(self.app.app_version));
                payload.insert("deviceId".to_string(), json!(self.app.phone_id));
                encode_body(Op::METHOD, payload)?
            }
        };

        Ok(OutboundRequest {
            method: Op::METHOD,
            url: format!("{}{}", self.base_url, Op::PATH),
            headers: self.headers.merged_with(&request_headers),
            body,
        })
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Query parameters for GET, compact JSON for POST
fn encode_body(method: Method, payload: Payload) -> Result<RequestBody> {
    match method {
        Method::Get => Ok(RequestBody::Query(
            payload
                .iter()
                .map(|(key, value)| (key.clone(), query_value(value)))
                .collect(),
        )),
        Method::Post => Ok(RequestBody::Json(serde_json::to_string(&Value::Object(
            payload,
        ))?)),
    }
}
