use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use wyze_api::{Credentials, Transport, WyzeClient};

use crate::config::{ConfigResolver, ProviderConfig};
use crate::device::DeviceType;
use crate::error::{Result, SmartbridgeError};
use crate::logging::{self, LoggingError, LoggingMode};
use crate::services::{BulbService, ContactSensorService, MotionSensorService, PlugService, VacuumService};

/// State shared by a provider, its services and every facade they create
#[derive(Debug)]
pub struct ProviderContext {
    client: WyzeClient,
    debug: bool,
}

impl ProviderContext {
    pub fn client(&self) -> &WyzeClient {
        &self.client
    }

}

/// Entry point for Wyze devices
///
/// ```rust,ignore
/// use smartbridge::{HasBrightness, WyzeProvider};
///
/// let provider = WyzeProvider::from_environment()?;
/// provider.authenticate()?;
///
/// if let Some(mut bulb) = provider.bulbs().get("7C78B2000001")? {
///     bulb.set_brightness(40)?;
/// }
/// ```
#[derive(Debug)]
pub struct WyzeProvider {
    context: Arc<ProviderContext>,
    username: Option<String>,
    password: Option<String>,
}

impl WyzeProvider {
    pub const NAME: &'static str = "wyze";

    pub fn new(config: ProviderConfig) -> Self {
        Self::build(config, None)
    }

    /// Route every vendor call through `transport`
    pub fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self::build(config, Some(transport))
    }

    pub fn from_resolver(resolver: &ConfigResolver) -> Result<Self> {
        Ok(Self::new(ProviderConfig::resolve(resolver)?))
    }

    /// Environment, config files and defaults
    pub fn from_environment() -> Result<Self> {
        Self::from_resolver(&ConfigResolver::standard(HashMap::new())?)
    }

    fn build(config: ProviderConfig, transport: Option<Arc<dyn Transport>>) -> Self {
        let ProviderConfig {
            app,
            username,
            password,
            credentials,
            transport: transport_config,
            debug,
            base_urls,
        } = config;

        // `debug` would resolve to `tracing::field::debug` inside the macro
        let debug_enabled = debug;
        info!(app_id = %app.app_id, app_version = %app.app_version, debug = debug_enabled, "creating wyze provider");

        let mut builder = WyzeClient::builder(app)
            .credentials(credentials)
            .transport_config(transport_config);
        for (service, url) in base_urls {
            builder = builder.base_url(service, url);
        }
        if let Some(transport) = transport {
            builder = builder.transport(transport);
        }

        Self {
            context: Arc::new(ProviderContext {
                client: builder.build(),
                debug,
            }),
            username,
            password,
        }
    }

    /// Obtain a fresh access token
    ///
    /// Uses the refresh token when one is held, otherwise logs in with the
    /// configured username and password.
    pub fn authenticate(&self) -> Result<Credentials> {
        let client = self.client();
        if client.credentials().refresh_token.is_some() {
            return client.refresh_token().map_err(|error| {
                warn!(%error, "token refresh failed");
                SmartbridgeError::from(error)
            });
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => self.login(username, password),
            _ => Err(SmartbridgeError::Config(
                "no refresh token and no username/password configured".to_string(),
            )),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Credentials> {
        Ok(self.client().login(username, password)?)
    }

    pub fn credentials(&self) -> Credentials {
        self.client().credentials()
    }

    pub fn has_service(&self, device_type: DeviceType) -> bool {
        device_type.family().is_some()
    }

    pub fn debug(&self) -> bool {
        self.context.debug
    }

    /// Install a subscriber: `Debug` when the debug flag is set, otherwise
    /// whatever `SMARTBRIDGE_LOG_MODE` asks for
    pub fn init_logging(&self) -> std::result::Result<(), LoggingError> {
        if logging::is_initialized() {
            return Ok(());
        }
        if self.context.debug {
            logging::init_logging(LoggingMode::Debug)
        } else {
            logging::init_logging_from_env()
        }
    }

    pub fn client(&self) -> &WyzeClient {
        &self.context.client
    }

    pub fn context(&self) -> &Arc<ProviderContext> {
        &self.context
    }

    pub fn bulbs(&self) -> BulbService {
        BulbService::new(Arc::clone(&self.context))
    }

    pub fn plugs(&self) -> PlugService {
        PlugService::new(Arc::clone(&self.context))
    }

    pub fn vacuums(&self) -> VacuumService {
        VacuumService::new(Arc::clone(&self.context))
    }

    pub fn contact_sensors(&self) -> ContactSensorService {
        ContactSensorService::new(Arc::clone(&self.context))
    }

    pub fn motion_sensors(&self) -> MotionSensorService {
        MotionSensorService::new(Arc::clone(&self.context))
    }
}
