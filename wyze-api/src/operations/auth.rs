//! Auth service operations

use serde_json::{json, Value};

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::operation::define_wyze_operation;
use crate::signature::hash_password;

define_wyze_operation! {
    operation: LoginOperation,
    service: Auth,
    method: Post,
    path: "/user/login",
    request: {
        email: String,
        password: String,
    },
    response: Credentials,
    payload: |req, _ctx| json!({
        "email": req.email,
        "password": hash_password(&req.password),
    }),
    parse: |envelope| credentials_from_login(&envelope.raw),
}

/// The login response carries tokens at the top level, not under `data`
fn credentials_from_login(raw: &Value) -> crate::error::Result<Credentials> {
    let access_token = raw
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::UnexpectedPayload("login response carries no access_token".to_string())
        })?;

    Ok(Credentials {
        access_token: Some(access_token.to_string()),
        refresh_token: raw
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(str::to_string),
        user_id: raw.get("user_id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AppInfo;
    use crate::operation::{RequestContext, WyzeOperation};
    use crate::signature::{md5_hex, Nonce};
    use vendor_client::ResponseEnvelope;

    #[test]
    fn test_login_payload_hashes_password() {
        let app = AppInfo::new("phone");
        let creds = Credentials::default();
        let nonce = Nonce::from_millis(1);
        let context = RequestContext {
            nonce: &nonce,
            app: &app,
            credentials: &creds,
        };
        let request = LoginOperationRequest {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
        };

        let payload = LoginOperation::build_payload(&request, &context);

        assert_eq!(payload["email"], json!("user@example.com"));
        assert_eq!(
            payload["password"],
            json!(md5_hex(md5_hex(md5_hex("secret"))))
        );
    }

    #[test]
    fn test_login_response_parsing() {
        let envelope = ResponseEnvelope::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "user_id": "u-1",
        }))
        .unwrap();

        let creds = LoginOperation::parse_response(envelope).unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("at"));
        assert_eq!(creds.refresh_token.as_deref(), Some("rt"));
        assert_eq!(creds.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn test_login_response_without_token() {
        let envelope = ResponseEnvelope::from_value(json!({"description": "nope"})).unwrap();
        assert!(matches!(
            LoginOperation::parse_response(envelope),
            Err(ApiError::UnexpectedPayload(_))
        ));
    }
}
