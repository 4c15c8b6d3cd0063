//! Platform service operations

use serde_json::{json, Value};

use crate::operation::{define_wyze_operation, require_data};

define_wyze_operation! {
    operation: GetVariableOperation,
    service: Platform,
    method: Get,
    path: "/app/v2/platform/get_variable",
    request: {
        keys: Vec<String>,
    },
    response: Value,
    payload: |req, _ctx| json!({
        "keys": req.keys.join(","),
        "category": "app",
    }),
    parse: |envelope| require_data(envelope, "/app/v2/platform/get_variable"),
}

define_wyze_operation! {
    operation: GetUserProfileOperation,
    service: Platform,
    method: Get,
    path: "/app/v2/platform/get_user_profile",
    request: {},
    response: Value,
    payload: |_req, _ctx| json!({}),
    parse: |envelope| require_data(envelope, "/app/v2/platform/get_user_profile"),
}
