//! Session identity: who the app claims to be and which tokens it holds

use serde::{Deserialize, Serialize};

/// Default application id of the Android app
pub const DEFAULT_APP_ID: &str = "9319141212m2ik";

/// Default app version reported to the cloud
pub const DEFAULT_APP_VERSION: &str = "2.16.55";

/// Identity of the client application
///
/// These values travel in headers and payloads on every request; the app id
/// also selects the signing salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub app_id: String,
    pub app_name: String,
    pub app_version: String,
    pub phone_id: String,
}

impl AppInfo {
    pub fn new(phone_id: impl Into<String>) -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            app_name: "wyze".to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            phone_id: phone_id.into(),
        }
    }

    /// Value of the `appinfo` header, e.g. `wyze_android_2.16.55`
    pub fn app_info_header(&self) -> String {
        format!("wyze_android_{}", self.app_version)
    }
}

/// Tokens issued by the auth service
///
/// Each field is optional because a session is built up over time: a fresh
/// client has nothing, a configured one may only have a refresh token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
}

impl Credentials {
    pub fn new(
        access_token: Option<String>,
        refresh_token: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            user_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}
