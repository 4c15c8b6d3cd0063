//! The five Wyze cloud services
//!
//! Each service has its own base URL, persistent header set and signing
//! scheme. Operations name the service they belong to; the client routes
//! them to the matching [`crate::ServiceClient`].

use vendor_client::HeaderSet;

use crate::credentials::AppInfo;

/// Application id the vacuum service insists on, whatever the configured one
pub const VENUS_APP_ID: &str = "venp_4c30f812828de875";

const AUTH_API_KEY: &str = "RckMFKbsds5p6QY3COEXc2ABwNTYY0q18ziEiSEm";
const OKHTTP_USER_AGENT: &str = "okhttp/4.7.2";
const LEGACY_SC: &str = "a626948714654991afd3c0dbd7cdb901";
const LEGACY_APP_NAME: &str = "com.hualai";

/// Which signing scheme a service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningVariant {
    /// Nonce, `requestid` and `signature2` headers over the wire bytes
    Dynamic,
    /// Signature-free body decorated with token, app fields, `sc`, `sv` and `ts`
    Legacy {
        sc: &'static str,
        app_name: &'static str,
    },
    /// Body decorated with app identity only
    Unsigned,
}

/// Wyze cloud services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Login
    Auth,
    /// Variables and user profile
    Platform,
    /// Robot vacuum plugin
    Venus,
    /// Analytics events
    General,
    /// Device list and properties (legacy API)
    DeviceApi,
}

/// Static endpoint information for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub base_url: &'static str,
    pub signing: SigningVariant,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Auth,
        Service::Platform,
        Service::Venus,
        Service::General,
        Service::DeviceApi,
    ];

    /// Stable index, used to keep one client slot per service
    pub fn index(&self) -> usize {
        match self {
            Service::Auth => 0,
            Service::Platform => 1,
            Service::Venus => 2,
            Service::General => 3,
            Service::DeviceApi => 4,
        }
    }

    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::Auth => ServiceInfo {
                name: "auth",
                base_url: "https://auth-prod.api.wyze.com",
                signing: SigningVariant::Dynamic,
            },
            Service::Platform => ServiceInfo {
                name: "platform",
                base_url: "https://wyze-platform-service.wyzecam.com",
                signing: SigningVariant::Dynamic,
            },
            Service::Venus => ServiceInfo {
                name: "venus",
                base_url: "https://wyze-venus-service-vn.wyzecam.com",
                signing: SigningVariant::Dynamic,
            },
            Service::General => ServiceInfo {
                name: "general",
                base_url: "https://wyze-general-api.wyzecam.com",
                signing: SigningVariant::Unsigned,
            },
            Service::DeviceApi => ServiceInfo {
                name: "device-api",
                base_url: "https://api.wyzecam.com",
                signing: SigningVariant::Legacy {
                    sc: LEGACY_SC,
                    app_name: LEGACY_APP_NAME,
                },
            },
        }
    }

    /// Application id used for this service's headers and signing salt
    pub fn app_id(&self, app: &AppInfo) -> String {
        match self {
            Service::Venus => VENUS_APP_ID.to_string(),
            _ => app.app_id.clone(),
        }
    }

    /// Headers sent with every request to this service
    pub fn headers(&self, app: &AppInfo) -> HeaderSet {
        let base = HeaderSet::new().with("accept-encoding", "gzip");
        match self {
            Service::Auth => base
                .with("phone-id", app.phone_id.as_str())
                .with("x-api-key", AUTH_API_KEY)
                .with("user-agent", app.app_info_header())
                .with("appinfo", app.app_info_header())
                .with("appid", self.app_id(app)),
            Service::Platform | Service::Venus => base
                .with("user-agent", OKHTTP_USER_AGENT)
                .with("appid", self.app_id(app))
                .with("appinfo", app.app_info_header())
                .with("phoneid", app.phone_id.as_str()),
            Service::General => base
                .with("user-agent", OKHTTP_USER_AGENT)
                .with("wyzesdktype", "100")
                .with("wyzesdkversion", "1.2.3"),
            Service::DeviceApi => base
                .with("user-agent", OKHTTP_USER_AGENT)
                .with("connection", "keep-alive"),
        }
    }
}
