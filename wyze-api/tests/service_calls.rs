//! End-to-end service calls against a local mock of the Wyze cloud

use mockito::{Matcher, Server};
use serde_json::json;
use wyze_api::signature::{family_salt, signature};
use wyze_api::{ApiError, AppInfo, Credentials, Service, WyzeClient, VENUS_APP_ID};

fn client_for(server: &Server, credentials: Credentials) -> WyzeClient {
    let mut builder = WyzeClient::builder(AppInfo::new("phone-test")).credentials(credentials);
    for service in Service::ALL {
        builder = builder.base_url(service, server.url());
    }
    builder.build()
}

fn session() -> Credentials {
    Credentials::new(
        Some("access-1".to_string()),
        Some("refresh-1".to_string()),
        Some("user-1".to_string()),
    )
}

#[test]
fn test_login_then_list_devices() {
    let mut server = Server::new();
    let login = server
        .mock("POST", "/user/login")
        .match_header("x-api-key", "RckMFKbsds5p6QY3COEXc2ABwNTYY0q18ziEiSEm")
        .match_header("requestid", Matcher::Regex("^[0-9a-f]{32}$".to_string()))
        .match_header("signature2", Matcher::Regex("^[0-9a-f]{32}$".to_string()))
        .match_body(Matcher::PartialJson(json!({"email": "user@example.com"})))
        .with_status(200)
        .with_body(r#"{"access_token":"at","refresh_token":"rt","user_id":"u-9"}"#)
        .create();
    let devices = server
        .mock("POST", "/app/v2/home_page/get_object_list")
        .match_body(Matcher::PartialJson(json!({
            "access_token": "at",
            "sv": "c417b62d72ee44bf933054bdca183e77",
            "sc": "a626948714654991afd3c0dbd7cdb901",
        })))
        .with_status(200)
        .with_body(
            r#"{"code":"1","data":{"device_list":[
                {"mac":"7C78B2000001","nickname":"Desk","product_model":"WLPA19"},
                {"mac":"JA_RO2_0001","nickname":"Robot","product_model":"JA_RO2"}
            ]}}"#,
        )
        .create();

    let client = client_for(&server, Credentials::default());
    let credentials = client.login("user@example.com", "secret").unwrap();
    assert_eq!(credentials.user_id.as_deref(), Some("u-9"));

    let listed = client.list_devices().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1]["product_model"], json!("JA_RO2"));

    login.assert();
    devices.assert();
}

#[test]
fn test_venus_get_is_signed_over_query() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/plugin/venus/get_iot_prop")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("did".into(), "JA_RO2_0001".into()),
            Matcher::UrlEncoded("keys".into(), "battary,mode".into()),
            Matcher::Regex("nonce=[0-9]+".to_string()),
        ]))
        .match_header("appid", VENUS_APP_ID)
        .match_header("access_token", "access-1")
        .with_status(200)
        .with_body(r#"{"code":1,"data":{"props":{"battary":87,"mode":1}}}"#)
        .create();

    let client = client_for(&server, session());
    let data = client
        .get_iot_prop("JA_RO2_0001", &["battary", "mode"])
        .unwrap()
        .unwrap();

    assert_eq!(data["props"]["battary"], json!(87));
    mock.assert();
}

#[test]
fn test_set_iot_action_signature_matches_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/plugin/venus/set_iot_action")
        .match_body(Matcher::PartialJson(json!({
            "cmd": "set_preference",
            "params": {"ctrltype": 1, "value": 3},
        })))
        .with_status(200)
        .with_body(r#"{"code":"1","data":null}"#)
        .create();

    let client = client_for(&server, session());
    client
        .set_vacuum_preference("JA_RO2_0001", "JA_RO2", 1, 3)
        .unwrap();
    mock.assert();

    // Re-sign the body the client produced and compare with its header
    let request = client
        .service(Service::Venus)
        .prepare::<wyze_api::operations::SetIotActionOperation>(
            &wyze_api::operations::SetIotActionOperationRequest {
                did: "JA_RO2_0001".to_string(),
                model: "JA_RO2".to_string(),
                cmd: "set_preference".to_string(),
                params: json!({"ctrltype": 1, "value": 3}),
                is_sub_device: false,
            },
            &session(),
            &wyze_api::signature::Nonce::from_millis(1700000000000),
        )
        .unwrap();
    let body = match &request.body {
        wyze_api::RequestBody::Json(body) => body.clone(),
        other => panic!("Expected JSON body, got {:?}", other),
    };
    let expected = signature(&body, Some("access-1"), family_salt(VENUS_APP_ID).unwrap()).unwrap();
    assert_eq!(request.headers.get("signature2"), Some(expected.as_str()));
}

#[test]
fn test_user_event_is_unsigned() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/user/event")
        .match_header("wyzesdkversion", "1.2.3")
        .match_body(Matcher::PartialJson(json!({
            "eventId": "WRV_CLEAN",
            "eventType": 1,
            "pid": VENUS_APP_ID,
            "uid": "user-1",
            "apiKey": "",
            "deviceId": "phone-test",
        })))
        .with_status(200)
        .with_body(r#"{"code":"1"}"#)
        .create();

    let client = client_for(&server, session());
    client.create_vacuum_event("WRV_CLEAN", 1).unwrap();
    mock.assert();
}

#[test]
fn test_platform_variable() {
    let mut server = Server::new();
    server
        .mock("GET", "/app/v2/platform/get_variable")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keys".into(), "a,b".into()),
            Matcher::UrlEncoded("category".into(), "app".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"code":1,"data":{"a":"1","b":"2"}}"#)
        .create();

    let client = client_for(&server, session());
    assert_eq!(client.get_variable(&["a", "b"]).unwrap(), json!({"a": "1", "b": "2"}));
}

#[test]
fn test_locked_account_is_authentication_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/app/user/refresh_token")
        .with_status(200)
        .with_body(r#"{"code":"2002","msg":"UserIsLocked"}"#)
        .create();

    let client = client_for(&server, session());
    let result = client.refresh_token();

    match result {
        Err(ApiError::AuthenticationFailure(fault)) => {
            assert_eq!(fault.message.as_deref(), Some("UserIsLocked"))
        }
        other => panic!("Expected AuthenticationFailure, got {:?}", other),
    }
    assert_eq!(client.credentials().access_token.as_deref(), Some("access-1"));
}

#[test]
fn test_bad_signature_is_protocol_mismatch() {
    let mut server = Server::new();
    server
        .mock("POST", "/app/v2/device/set_property")
        .with_status(200)
        .with_body(r#"{"code":"1004","msg":"signature error"}"#)
        .create();

    let client = client_for(&server, session());
    let result = client.set_device_property("7C78B2000001", "WLPA19", "P1501", "50");
    assert!(matches!(result, Err(ApiError::ProtocolMismatch(_))));
}
