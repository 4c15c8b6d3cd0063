//! HTTP-level tests for the blocking transport
//!
//! These run the real `ureq` agent against a local mockito server.

use mockito::{Matcher, Server};
use serde_json::json;
use vendor_client::{
    HeaderSet, HttpTransport, Method, OutboundRequest, RequestBody, Transport, TransportError,
};

fn post(url: String, headers: HeaderSet, body: &str) -> OutboundRequest {
    OutboundRequest {
        method: Method::Post,
        url,
        headers,
        body: RequestBody::Json(body.to_string()),
    }
}

#[test]
fn test_post_sends_exact_body_and_headers() {
    let mut server = Server::new();
    let body = r#"{"nonce":"1614006488650","sv":"c417b62d72ee44bf933054bdca183e77"}"#;
    let mock = server
        .mock("POST", "/app/v2/home_page/get_object_list")
        .match_header("user-agent", "okhttp/4.7.2")
        .match_header("signature2", "deadbeef")
        .match_body(Matcher::Exact(body.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":"1","msg":"","data":{"device_list":[]}}"#)
        .create();

    let headers = HeaderSet::new()
        .with("user-agent", "okhttp/4.7.2")
        .with("signature2", "deadbeef");
    let transport = HttpTransport::new();
    let envelope = transport
        .send(&post(
            format!("{}/app/v2/home_page/get_object_list", server.url()),
            headers,
            body,
        ))
        .unwrap();

    mock.assert();
    assert_eq!(envelope.data, Some(json!({"device_list": []})));
}

#[test]
fn test_get_sends_query_parameters() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/plugin/venus/get_iot_prop")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("did".into(), "JA_RO2_ABC".into()),
            Matcher::UrlEncoded("keys".into(), "battary,mode".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":1,"data":{"props":{"battary":88,"mode":1}}}"#)
        .create();

    let transport = HttpTransport::new();
    let envelope = transport
        .send(&OutboundRequest {
            method: Method::Get,
            url: format!("{}/plugin/venus/get_iot_prop", server.url()),
            headers: HeaderSet::new(),
            body: RequestBody::Query(vec![
                ("did".to_string(), "JA_RO2_ABC".to_string()),
                ("keys".to_string(), "battary,mode".to_string()),
            ]),
        })
        .unwrap();

    mock.assert();
    assert_eq!(envelope.code.as_deref(), Some("1"));
}

#[test]
fn test_business_code_is_classified() {
    let mut server = Server::new();
    server
        .mock("POST", "/app/user/refresh_token")
        .with_status(200)
        .with_body(r#"{"code":"2001","msg":"AccessTokenError","data":{}}"#)
        .create();

    let transport = HttpTransport::new();
    let result = transport.send(&post(
        format!("{}/app/user/refresh_token", server.url()),
        HeaderSet::new(),
        "{}",
    ));

    match result {
        Err(TransportError::Authentication(fault)) => {
            assert_eq!(fault.code, "2001");
            assert_eq!(fault.message.as_deref(), Some("AccessTokenError"));
        }
        other => panic!("Expected Authentication, got {:?}", other),
    }
}

#[test]
fn test_success_status_with_html_body_is_unexpected_payload() {
    let mut server = Server::new();
    server
        .mock("POST", "/user/login")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let transport = HttpTransport::new();
    let result = transport.send(&post(
        format!("{}/user/login", server.url()),
        HeaderSet::new(),
        "{}",
    ));

    assert!(matches!(result, Err(TransportError::UnexpectedPayload(_))));
}

#[test]
fn test_error_status_without_envelope_is_connection_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/user/login")
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let transport = HttpTransport::new();
    let result = transport.send(&post(
        format!("{}/user/login", server.url()),
        HeaderSet::new(),
        "{}",
    ));

    match result {
        Err(TransportError::ConnectionFailure(msg)) => assert!(msg.contains("503")),
        other => panic!("Expected ConnectionFailure, got {:?}", other),
    }
}

#[test]
fn test_error_status_with_envelope_is_classified() {
    let mut server = Server::new();
    server
        .mock("POST", "/app/v2/device/set_property")
        .with_status(400)
        .with_body(r#"{"code":"1004","msg":"signature error"}"#)
        .create();

    let transport = HttpTransport::new();
    let result = transport.send(&post(
        format!("{}/app/v2/device/set_property", server.url()),
        HeaderSet::new(),
        "{}",
    ));

    assert!(matches!(result, Err(TransportError::ProtocolMismatch(_))));
}

#[test]
fn test_unreachable_host_is_connection_failure() {
    let transport = HttpTransport::new();
    let result = transport.send(&post(
        "http://127.0.0.1:1/user/login".to_string(),
        HeaderSet::new(),
        "{}",
    ));

    assert!(matches!(result, Err(TransportError::ConnectionFailure(_))));
}
