//! Operation framework for the Wyze services
//!
//! An operation is a zero-sized type tying together a request struct, the
//! service and path it targets, how its payload is built and how the
//! response envelope is turned into a typed result. Signing and envelope
//! decoration are the service client's job, not the operation's.

use serde_json::{Map, Value};
use vendor_client::{Method, ResponseEnvelope};

use crate::credentials::{AppInfo, Credentials};
use crate::error::{ApiError, Result};
use crate::service::Service;
use crate::signature::Nonce;

/// Request payload before the service client decorates it
pub type Payload = Map<String, Value>;

/// Per-request values an operation may need for its payload
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub nonce: &'a Nonce,
    pub app: &'a AppInfo,
    pub credentials: &'a Credentials,
}

/// Base trait for all Wyze operations
pub trait WyzeOperation {
    type Request;
    type Response;

    /// The service this operation is sent to
    const SERVICE: Service;

    const METHOD: Method;

    /// Path appended to the service's base URL
    const PATH: &'static str;

    /// Build the undecorated payload for this request
    fn build_payload(request: &Self::Request, context: &RequestContext<'_>) -> Payload;

    /// Turn an already classified, successful envelope into the typed response
    fn parse_response(envelope: ResponseEnvelope) -> Result<Self::Response>;
}

/// Convert a `json!` object into a payload; anything else becomes empty
pub fn into_payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The envelope's `data`, required
pub fn require_data(envelope: ResponseEnvelope, path: &str) -> Result<Value> {
    envelope
        .data
        .ok_or_else(|| ApiError::UnexpectedPayload(format!("{} response carries no data", path)))
}

/// Render a payload value the way it appears in a query string
pub fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Declare an operation with its request struct in one place
///
/// ```rust,ignore
/// define_wyze_operation! {
///     operation: GetIotPropOperation,
///     service: Venus,
///     method: Get,
///     path: "/plugin/venus/get_iot_prop",
///     request: { did: String, keys: Vec<String> },
///     response: Option<serde_json::Value>,
///     payload: |req, _ctx| json!({ "did": req.did, "keys": req.keys.join(",") }),
///     parse: |envelope| Ok(envelope.data),
/// }
/// ```
macro_rules! define_wyze_operation {
    (
        operation: $op_struct:ident,
        service: $service:ident,
        method: $method:ident,
        path: $path:literal,
        request: {
            $($field:ident: $field_type:ty),* $(,)?
        },
        response: $response_type:ty,
        payload: |$req_param:ident, $ctx_param:ident| $payload_expr:expr,
        parse: |$envelope_param:ident| $parse_expr:expr $(,)?
    ) => {
        paste::paste! {
            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
            }

            pub struct $op_struct;

            impl $crate::operation::WyzeOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = $response_type;

                const SERVICE: $crate::service::Service = $crate::service::Service::$service;
                const METHOD: vendor_client::Method = vendor_client::Method::$method;
                const PATH: &'static str = $path;

                fn build_payload(
                    request: &Self::Request,
                    context: &$crate::operation::RequestContext<'_>,
                ) -> $crate::operation::Payload {
                    let $req_param = request;
                    let $ctx_param = context;
                    $crate::operation::into_payload($payload_expr)
                }

                fn parse_response(
                    envelope: vendor_client::ResponseEnvelope,
                ) -> $crate::error::Result<Self::Response> {
                    let $envelope_param = envelope;
                    $parse_expr
                }
            }
        }
    };
}

pub(crate) use define_wyze_operation;
