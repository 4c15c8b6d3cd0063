use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::{debug, info};
use vendor_client::{HttpTransport, Transport, TransportConfig};

use crate::credentials::{AppInfo, Credentials};
use crate::error::{ApiError, Result};
use crate::operation::WyzeOperation;
use crate::operations::*;
use crate::service::{Service, VENUS_APP_ID};
use crate::service_client::ServiceClient;

/// A client for the Wyze cloud
///
/// Holds the session (app identity and tokens) and one lazily created
/// [`ServiceClient`] per service. Tokens are read at send time, so a
/// refresh is picked up by every service without rebuilding anything.
///
/// ```rust,ignore
/// use wyze_api::{AppInfo, WyzeClient};
///
/// let client = WyzeClient::new(AppInfo::new("phone-id"));
/// client.login("user@example.com", "password")?;
/// for device in client.list_devices()? {
///     println!("{}", device["nickname"]);
/// }
/// ```
pub struct WyzeClient {
    app: AppInfo,
    credentials: RwLock<Credentials>,
    transport_config: TransportConfig,
    transport: Option<Arc<dyn Transport>>,
    base_urls: HashMap<Service, String>,
    services: [OnceLock<ServiceClient>; 5],
}

/// Builder for [`WyzeClient`]
pub struct WyzeClientBuilder {
    app: AppInfo,
    credentials: Credentials,
    transport_config: TransportConfig,
    transport: Option<Arc<dyn Transport>>,
    base_urls: HashMap<Service, String>,
}

impl WyzeClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Route every service through this transport instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Point a service at another base URL
    pub fn base_url(mut self, service: Service, url: impl Into<String>) -> Self {
        self.base_urls.insert(service, url.into());
        self
    }

    pub fn build(self) -> WyzeClient {
        WyzeClient {
            app: self.app,
            credentials: RwLock::new(self.credentials),
            transport_config: self.transport_config,
            transport: self.transport,
            base_urls: self.base_urls,
            services: std::array::from_fn(|_| OnceLock::new()),
        }
    }
}

impl WyzeClient {
    /// Create an unauthenticated client with default transport settings
    pub fn new(app: AppInfo) -> Self {
        Self::builder(app).build()
    }

    pub fn builder(app: AppInfo) -> WyzeClientBuilder {
        WyzeClientBuilder {
            app,
            credentials: Credentials::default(),
            transport_config: TransportConfig::default(),
            transport: None,
            base_urls: HashMap::new(),
        }
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    /// Snapshot of the current tokens
    pub fn credentials(&self) -> Credentials {
        self.credentials.read().clone()
    }

    pub fn set_credentials(&self, credentials: Credentials) {
        *self.credentials.write() = credentials;
    }

    /// The client for one service, created on first use
    pub fn service(&self, service: Service) -> &ServiceClient {
        self.services[service.index()].get_or_init(|| {
            let transport: Arc<dyn Transport> = match &self.transport {
                Some(transport) => Arc::clone(transport),
                None => Arc::new(HttpTransport::with_config(self.transport_config)),
            };
            let base_url = self
                .base_urls
                .get(&service)
                .cloned()
                .unwrap_or_else(|| service.info().base_url.to_string());

            debug!(service = service.info().name, %base_url, "creating service client");
            ServiceClient::new(service, self.app.clone(), base_url, transport)
        })
    }

    /// Execute any operation against the service it names
    pub fn execute<Op: WyzeOperation>(&self, request: &Op::Request) -> Result<Op::Response> {
        let credentials = self.credentials();
        self.service(Op::SERVICE).execute::<Op>(request, &credentials)
    }

    /// Log in with username and password and keep the issued tokens
    pub fn login(&self, email: &str, password: &str) -> Result<Credentials> {
        let credentials = self.execute::<LoginOperation>(&LoginOperationRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        info!(user_id = ?credentials.user_id, "logged in");
        self.set_credentials(credentials.clone());
        Ok(credentials)
    }

    /// Exchange the refresh token for a new access token
    ///
    /// The stored session is updated; the user id is kept, and so is the old
    /// refresh token when the vendor does not rotate it.
    pub fn refresh_token(&self) -> Result<Credentials> {
        let refresh_token = self
            .credentials
            .read()
            .refresh_token
            .clone()
            .ok_or(ApiError::MissingCredentials("refresh_token"))?;

        let issued = self.execute::<RefreshTokenOperation>(&RefreshTokenOperationRequest {
            refresh_token: refresh_token.clone(),
        })?;

        let mut credentials = self.credentials.write();
        credentials.access_token = issued.access_token;
        credentials.refresh_token = issued.refresh_token.or(Some(refresh_token));
        debug!("access token refreshed");
        Ok(credentials.clone())
    }

    /// Every device record on the account
    pub fn list_devices(&self) -> Result<Vec<Value>> {
        self.execute::<GetObjectListOperation>(&GetObjectListOperationRequest {})
    }

    /// Property envelope for one device, `data.property_list` inside
    pub fn get_device_property_list(
        &self,
        device_mac: &str,
        device_model: &str,
        target_pids: &[&str],
    ) -> Result<Value> {
        self.execute::<GetDevicePropertyListOperation>(&GetDevicePropertyListOperationRequest {
            device_mac: device_mac.to_string(),
            device_model: device_model.to_string(),
            target_pid_list: to_strings(target_pids),
        })
    }

    pub fn get_device_list_property_list(
        &self,
        devices: &[&str],
        target_pids: &[&str],
    ) -> Result<Value> {
        self.execute::<GetDeviceListPropertyListOperation>(
            &GetDeviceListPropertyListOperationRequest {
                device_list: to_strings(devices),
                target_pid_list: to_strings(target_pids),
            },
        )
    }

    /// Write one property; the value is sent as text
    pub fn set_device_property(
        &self,
        device_mac: &str,
        device_model: &str,
        pid: &str,
        value: &str,
    ) -> Result<()> {
        self.execute::<SetDevicePropertyOperation>(&SetDevicePropertyOperationRequest {
            device_mac: device_mac.to_string(),
            device_model: device_model.to_string(),
            pid: pid.to_string(),
            pvalue: value.to_string(),
        })
    }

    pub fn get_iot_prop(&self, did: &str, keys: &[&str]) -> Result<Option<Value>> {
        self.execute::<GetIotPropOperation>(&GetIotPropOperationRequest {
            did: did.to_string(),
            keys: to_strings(keys),
        })
    }

    pub fn get_device_info(&self, did: &str, keys: &[&str]) -> Result<Option<Value>> {
        self.execute::<GetDeviceInfoOperation>(&GetDeviceInfoOperationRequest {
            device_id: did.to_string(),
            keys: to_strings(keys),
        })
    }

    pub fn get_current_position(&self, did: &str) -> Result<Option<Value>> {
        self.execute::<GetCurrentPositionOperation>(&GetCurrentPositionOperationRequest {
            did: did.to_string(),
        })
    }

    /// Current map as the vendor returns it; the map blob is not decoded
    pub fn get_current_map(&self, did: &str) -> Result<Option<Value>> {
        self.execute::<GetCurrentMapOperation>(&GetCurrentMapOperationRequest {
            did: did.to_string(),
        })
    }

    pub fn get_sweep_records(&self, did: &str, keys: &[&str]) -> Result<Option<Value>> {
        self.execute::<GetSweepRecordsOperation>(&GetSweepRecordsOperationRequest {
            did: did.to_string(),
            keys: to_strings(keys),
        })
    }

    pub fn set_iot_action(
        &self,
        did: &str,
        model: &str,
        cmd: &str,
        params: Value,
    ) -> Result<Option<Value>> {
        self.execute::<SetIotActionOperation>(&SetIotActionOperationRequest {
            did: did.to_string(),
            model: model.to_string(),
            cmd: cmd.to_string(),
            params,
            is_sub_device: false,
        })
    }

    /// `set_mode` action: `{type, value}`
    pub fn set_vacuum_mode(&self, did: &str, model: &str, kind: u32, value: u32) -> Result<()> {
        self.set_iot_action(did, model, "set_mode", json!({ "type": kind, "value": value }))?;
        Ok(())
    }

    /// `set_preference` action: `{ctrltype, value}`
    pub fn set_vacuum_preference(
        &self,
        did: &str,
        model: &str,
        control_type: u32,
        value: u32,
    ) -> Result<()> {
        self.set_iot_action(
            did,
            model,
            "set_preference",
            json!({ "ctrltype": control_type, "value": value }),
        )?;
        Ok(())
    }

    pub fn create_user_event(&self, pid: &str, event_id: &str, event_type: u32) -> Result<()> {
        self.execute::<PostUserEventOperation>(&PostUserEventOperationRequest {
            pid: pid.to_string(),
            event_id: event_id.to_string(),
            event_type,
        })
    }

    /// Analytics event attributed to the vacuum plugin
    pub fn create_vacuum_event(&self, event_id: &str, event_type: u32) -> Result<()> {
        self.create_user_event(VENUS_APP_ID, event_id, event_type)
    }

    pub fn get_user_profile(&self) -> Result<Value> {
        self.execute::<GetUserProfileOperation>(&GetUserProfileOperationRequest {})
    }

    pub fn get_variable(&self, keys: &[&str]) -> Result<Value> {
        self.execute::<GetVariableOperation>(&GetVariableOperationRequest {
            keys: to_strings(keys),
        })
    }
}

impl fmt::Debug for WyzeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WyzeClient")
            .field("app", &self.app)
            .field("authenticated", &self.credentials.read().is_authenticated())
            .field("base_urls", &self.base_urls)
            .finish()
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
