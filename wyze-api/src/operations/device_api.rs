//! Legacy device API operations
//!
//! Every call is a POST whose body the service client decorates with the
//! token, app identity, `sc` and `ts`. Each endpoint carries its own `sv`
//! constant in the payload.

use serde_json::{json, Value};

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::operation::{define_wyze_operation, require_data};

const SV_REFRESH_TOKEN: &str = "d91914dd28b7492ab9dd17f7707d35a3";
const SV_SET_DEVICE_PROPERTY: &str = "44b6d5640c4d4978baba65c8ab9a6d6e";
const SV_GET_DEVICE_LIST_PROPERTY_LIST: &str = "be9e90755d3445d0a4a583c8314972b6";
const SV_GET_DEVICE_PROPERTY_LIST: &str = "1df2807c63254e16a06213323fe8dec8";
const SV_GET_OBJECT_LIST: &str = "c417b62d72ee44bf933054bdca183e77";

define_wyze_operation! {
    operation: RefreshTokenOperation,
    service: DeviceApi,
    method: Post,
    path: "/app/user/refresh_token",
    request: {
        refresh_token: String,
    },
    response: Credentials,
    payload: |req, _ctx| json!({
        "refresh_token": req.refresh_token,
        "sv": SV_REFRESH_TOKEN,
    }),
    parse: |envelope| {
        let data = require_data(envelope, "/app/user/refresh_token")?;
        let token = |name: &str| data.get(name).and_then(Value::as_str).map(str::to_string);
        match token("access_token") {
            Some(access_token) => Ok(Credentials {
                access_token: Some(access_token),
                refresh_token: token("refresh_token"),
                user_id: None,
            }),
            None => Err(ApiError::UnexpectedPayload(
                "refresh response carries no access_token".to_string(),
            )),
        }
    },
}

define_wyze_operation! {
    operation: SetDevicePropertyOperation,
    service: DeviceApi,
    method: Post,
    path: "/app/v2/device/set_property",
    request: {
        device_mac: String,
        device_model: String,
        pid: String,
        pvalue: String,
    },
    response: (),
    payload: |req, _ctx| json!({
        "device_mac": req.device_mac,
        "device_model": req.device_model,
        "pid": req.pid,
        "pvalue": req.pvalue,
        "sv": SV_SET_DEVICE_PROPERTY,
    }),
    parse: |_envelope| Ok(()),
}

define_wyze_operation! {
    operation: GetDeviceListPropertyListOperation,
    service: DeviceApi,
    method: Post,
    path: "/app/v2/device_list/get_property_list",
    request: {
        device_list: Vec<String>,
        target_pid_list: Vec<String>,
    },
    response: Value,
    payload: |req, _ctx| json!({
        "device_list": req.device_list,
        "target_pid_list": req.target_pid_list,
        "sv": SV_GET_DEVICE_LIST_PROPERTY_LIST,
    }),
    parse: |envelope| require_data(envelope, "/app/v2/device_list/get_property_list"),
}

define_wyze_operation! {
    operation: GetDevicePropertyListOperation,
    service: DeviceApi,
    method: Post,
    path: "/app/v2/device/get_property_list",
    request: {
        device_mac: String,
        device_model: String,
        target_pid_list: Vec<String>,
    },
    // The whole envelope: callers merge it into the device record, which
    // puts the properties under `data.property_list`.
    response: Value,
    payload: |req, _ctx| json!({
        "device_mac": req.device_mac,
        "device_model": req.device_model,
        "target_pid_list": req.target_pid_list,
        "sv": SV_GET_DEVICE_PROPERTY_LIST,
    }),
    parse: |envelope| Ok(envelope.raw),
}

define_wyze_operation! {
    operation: GetObjectListOperation,
    service: DeviceApi,
    method: Post,
    path: "/app/v2/home_page/get_object_list",
    request: {},
    response: Vec<Value>,
    payload: |_req, _ctx| json!({ "sv": SV_GET_OBJECT_LIST }),
    parse: |envelope| {
        let data = require_data(envelope, "/app/v2/home_page/get_object_list")?;
        match data.get("device_list") {
            Some(Value::Array(devices)) => Ok(devices.clone()),
            _ => Err(ApiError::UnexpectedPayload(
                "object list carries no device_list".to_string(),
            )),
        }
    },
}
