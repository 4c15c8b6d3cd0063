//! Venus (robot vacuum) service operations
//!
//! Read operations return the envelope's `data` as-is; a `null` or missing
//! `data` is not an error, the vacuum simply has nothing to report.

use serde_json::{json, Value};

use crate::operation::define_wyze_operation;

/// Fixed lower bound the app uses when querying sweep history
const SWEEP_HISTORY_SINCE: u64 = 1614006488650;
const SWEEP_HISTORY_COUNT: u32 = 20;

define_wyze_operation! {
    operation: GetCurrentPositionOperation,
    service: Venus,
    method: Get,
    path: "/plugin/venus/memory_map/current_position",
    request: {
        did: String,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({ "did": req.did }),
    parse: |envelope| Ok(envelope.data),
}

define_wyze_operation! {
    operation: GetCurrentMapOperation,
    service: Venus,
    method: Get,
    path: "/plugin/venus/memory_map/current_map",
    request: {
        did: String,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({ "did": req.did }),
    parse: |envelope| Ok(envelope.data),
}

define_wyze_operation! {
    operation: GetSweepRecordsOperation,
    service: Venus,
    method: Get,
    path: "/plugin/venus/sweep_record/query_data",
    request: {
        did: String,
        keys: Vec<String>,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({
        "purpose": "history_map",
        "last_time": SWEEP_HISTORY_SINCE,
        "count": SWEEP_HISTORY_COUNT,
        "did": req.did,
        "keys": req.keys.join(","),
    }),
    parse: |envelope| Ok(envelope.data),
}

define_wyze_operation! {
    operation: GetIotPropOperation,
    service: Venus,
    method: Get,
    path: "/plugin/venus/get_iot_prop",
    request: {
        did: String,
        keys: Vec<String>,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({
        "did": req.did,
        "keys": req.keys.join(","),
    }),
    parse: |envelope| Ok(envelope.data),
}

define_wyze_operation! {
    operation: GetDeviceInfoOperation,
    service: Venus,
    method: Get,
    path: "/plugin/venus/device_info",
    request: {
        device_id: String,
        keys: Vec<String>,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({
        "device_id": req.device_id,
        "keys": req.keys.join(","),
    }),
    parse: |envelope| Ok(envelope.data),
}

define_wyze_operation! {
    operation: SetIotActionOperation,
    service: Venus,
    method: Post,
    path: "/plugin/venus/set_iot_action",
    request: {
        did: String,
        model: String,
        cmd: String,
        params: Value,
        is_sub_device: bool,
    },
    response: Option<Value>,
    payload: |req, _ctx| json!({
        "cmd": req.cmd,
        "did": req.did,
        "model": req.model,
        "is_sub_device": req.is_sub_device,
        "params": req.params,
    }),
    parse: |envelope| Ok(envelope.data),
}
