//! General API operations (analytics events)

use serde_json::json;

use crate::operation::define_wyze_operation;

define_wyze_operation! {
    operation: PostUserEventOperation,
    service: General,
    method: Post,
    path: "/v1/user/event",
    request: {
        pid: String,
        event_id: String,
        event_type: u32,
    },
    response: (),
    payload: |req, ctx| json!({
        "eventId": req.event_id,
        "eventType": req.event_type,
        "logSdk": 100,
        "logTime": ctx.nonce.as_millis(),
        "nonce": ctx.nonce.as_str(),
        "osInfo": "Android",
        "osVersion": "9",
        "pid": req.pid,
        "uid": ctx.credentials.user_id,
    }),
    parse: |_envelope| Ok(()),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{AppInfo, Credentials};
    use crate::operation::{RequestContext, WyzeOperation};
    use crate::signature::Nonce;

    #[test]
    fn test_event_payload_uses_nonce_and_user() {
        let app = AppInfo::new("phone");
        let creds = Credentials::new(None, None, Some("user-42".to_string()));
        let nonce = Nonce::from_millis(1614006488650);
        let context = RequestContext {
            nonce: &nonce,
            app: &app,
            credentials: &creds,
        };

        let payload = PostUserEventOperation::build_payload(
            &PostUserEventOperationRequest {
                pid: "venp_4c30f812828de875".to_string(),
                event_id: "WRV_CLEAN".to_string(),
                event_type: 1,
            },
            &context,
        );

        assert_eq!(payload["logTime"], json!(1614006488650i64));
        assert_eq!(payload["nonce"], json!("1614006488650"));
        assert_eq!(payload["uid"], json!("user-42"));
        assert_eq!(payload["eventId"], json!("WRV_CLEAN"));
    }
}
