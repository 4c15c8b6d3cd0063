//! Layered provider configuration
//!
//! A [`ConfigResolver`] holds an ordered list of [`ConfigSource`]s and asks
//! each in turn; the first source that knows a key wins. The standard order
//! is explicit values, environment variables, config files, then compiled-in
//! defaults.
//!
//! Config files are TOML with a `[wyze]` section:
//!
//! ```toml
//! [wyze]
//! wyze_username = "me@example.com"
//! wyze_password = "secret"
//! smartbridge_debug = true
//! wyze_read_timeout_secs = 30
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, trace};
use wyze_api::{AppInfo, Credentials, Service, TransportConfig, DEFAULT_APP_ID, DEFAULT_APP_VERSION};

use crate::error::{Result, SmartbridgeError};

pub mod keys {
    pub const APP_ID: &str = "wyze_app_id";
    pub const APP_NAME: &str = "wyze_app_name";
    pub const APP_VERSION: &str = "wyze_app_version";
    pub const PHONE_ID: &str = "wyze_phone_id";
    pub const USERNAME: &str = "wyze_username";
    pub const PASSWORD: &str = "wyze_password";
    pub const ACCESS_TOKEN: &str = "wyze_access_token";
    pub const REFRESH_TOKEN: &str = "wyze_refresh_token";
    pub const USER_ID: &str = "wyze_user_id";
    pub const CONNECT_TIMEOUT: &str = "wyze_connect_timeout_secs";
    pub const READ_TIMEOUT: &str = "wyze_read_timeout_secs";
    pub const DEBUG: &str = "smartbridge_debug";
}

/// System-wide config file
pub const SYSTEM_CONFIG_FILE: &str = "/etc/smartbridge.toml";

/// Per-user config file, relative to the home directory
pub const USER_CONFIG_FILE: &str = ".smartbridge";

const FILE_SECTION: &str = "wyze";

/// One layer of configuration
pub trait ConfigSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Option<String>;
}

/// Values passed in by the application
#[derive(Debug, Clone, Default)]
pub struct ExplicitSource {
    values: HashMap<String, String>,
}

impl ExplicitSource {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for ExplicitSource {
    fn name(&self) -> &str {
        "explicit"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

type EnvReader = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variables: the key upper-cased, `smartbridge_debug` as `SB_DEBUG`
pub struct EnvSource {
    reader: EnvReader,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::with_reader(|name| std::env::var(name).ok())
    }

    /// Read variables through `reader` instead of the process environment
    pub fn with_reader(reader: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    pub fn variable_name(key: &str) -> String {
        if key == keys::DEBUG {
            "SB_DEBUG".to_string()
        } else {
            key.to_ascii_uppercase()
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource").finish_non_exhaustive()
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.reader)(&Self::variable_name(key)).filter(|value| !value.is_empty())
    }
}

/// The `[wyze]` section of one or more TOML files, later files winning
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    values: HashMap<String, String>,
    files: Vec<PathBuf>,
}

impl FileSource {
    /// The system file, then the user file; missing files are skipped
    pub fn standard() -> Result<Self> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_FILE));
        }
        Self::load(&paths)
    }

    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut source = FileSource::default();
        for path in paths {
            if !path.is_file() {
                trace!(path = %path.display(), "config file not present");
                continue;
            }
            let text = fs::read_to_string(path).map_err(|e| {
                SmartbridgeError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            source.merge(&text, path)?;
            source.files.push(path.clone());
            debug!(path = %path.display(), "loaded config file");
        }
        Ok(source)
    }

    /// Parse a single document
    pub fn parse(text: &str) -> Result<Self> {
        let mut source = FileSource::default();
        source.merge(text, Path::new("<inline>"))?;
        Ok(source)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn merge(&mut self, text: &str, origin: &Path) -> Result<()> {
        let document: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            SmartbridgeError::Config(format!("{}: {}", origin.display(), e.message()))
        })?;

        let Some(section) = document.get(FILE_SECTION) else {
            return Ok(());
        };
        let section = section.as_table().ok_or_else(|| {
            SmartbridgeError::Config(format!("{}: [{}] is not a table", origin.display(), FILE_SECTION))
        })?;

        for (key, value) in section {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.values.insert(key.clone(), text);
        }
        Ok(())
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Compiled-in defaults; the phone id is generated once per source
#[derive(Debug, Clone)]
pub struct DefaultSource {
    phone_id: String,
}

impl DefaultSource {
    pub fn new() -> Self {
        Self {
            phone_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl Default for DefaultSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for DefaultSource {
    fn name(&self) -> &str {
        "default"
    }

    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            keys::APP_ID => DEFAULT_APP_ID,
            keys::APP_NAME => "wyze",
            keys::APP_VERSION => DEFAULT_APP_VERSION,
            keys::PHONE_ID => self.phone_id.as_str(),
            keys::DEBUG => "false",
            _ => return None,
        };
        Some(value.to_string())
    }
}

/// Ordered list of configuration sources
#[derive(Default)]
pub struct ConfigResolver {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source below the existing ones
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Explicit values, environment, config files, defaults
    pub fn standard(explicit: HashMap<String, String>) -> Result<Self> {
        Ok(Self::new()
            .with_source(ExplicitSource::new(explicit))
            .with_source(EnvSource::new())
            .with_source(FileSource::standard()?)
            .with_source(DefaultSource::new()))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let value = source.get(key)?;
            trace!(key, source = source.name(), "config value resolved");
            Some(value)
        })
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// `1`, `true`, `yes` and `on` are true; unset is false
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map_or(false, |value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.get(key)
            .map(|value| {
                value.trim().parse().map_err(|_| {
                    SmartbridgeError::Config(format!("{} must be a whole number, got '{}'", key, value))
                })
            })
            .transpose()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("sources", &self.source_names())
            .finish()
    }
}

/// Everything a provider needs, resolved once at construction
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub app: AppInfo,
    pub username: Option<String>,
    pub password: Option<String>,
    pub credentials: Credentials,
    pub transport: TransportConfig,
    pub debug: bool,
    /// Service base URL overrides
    pub base_urls: HashMap<Service, String>,
}

impl ProviderConfig {
    /// Defaults only, with a fresh phone id
    pub fn new() -> Self {
        let defaults = DefaultSource::new();
        Self {
            app: AppInfo::new(defaults.phone_id),
            username: None,
            password: None,
            credentials: Credentials::default(),
            transport: TransportConfig::default(),
            debug: false,
            base_urls: HashMap::new(),
        }
    }

    pub fn resolve(resolver: &ConfigResolver) -> Result<Self> {
        let phone_id = resolver
            .get(keys::PHONE_ID)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let app = AppInfo {
            app_id: resolver.get_or(keys::APP_ID, DEFAULT_APP_ID),
            app_name: resolver.get_or(keys::APP_NAME, "wyze"),
            app_version: resolver.get_or(keys::APP_VERSION, DEFAULT_APP_VERSION),
            phone_id,
        };

        let credentials = Credentials::new(
            resolver.get(keys::ACCESS_TOKEN),
            resolver.get(keys::REFRESH_TOKEN),
            resolver.get(keys::USER_ID),
        );

        let transport = TransportConfig {
            connect_timeout: resolver.get_u64(keys::CONNECT_TIMEOUT)?.map(Duration::from_secs),
            read_timeout: resolver.get_u64(keys::READ_TIMEOUT)?.map(Duration::from_secs),
        };

        Ok(Self {
            app,
            username: resolver.get(keys::USERNAME),
            password: resolver.get(keys::PASSWORD),
            credentials,
            transport,
            debug: resolver.get_bool(keys::DEBUG),
            base_urls: HashMap::new(),
        })
    }

    pub fn with_base_url(mut self, service: Service, url: impl Into<String>) -> Self {
        self.base_urls.insert(service, url.into());
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("app", &self.app)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("authenticated", &self.credentials.is_authenticated())
            .field("transport", &self.transport)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn env(vars: &[(&'static str, &'static str)]) -> EnvSource {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSource::with_reader(move |name| vars.get(name).cloned())
    }

    #[rstest]
    #[case("wyze_username", "WYZE_USERNAME")]
    #[case("wyze_app_id", "WYZE_APP_ID")]
    #[case("smartbridge_debug", "SB_DEBUG")]
    fn test_env_variable_names(#[case] key: &str, #[case] variable: &str) {
        assert_eq!(EnvSource::variable_name(key), variable);
    }

    #[test]
    fn test_precedence() {
        let file = FileSource::parse(
            r#"
            [wyze]
            wyze_username = "file-user"
            wyze_password = "file-pass"
            wyze_app_version = "9.9.9"
            "#,
        )
        .unwrap();

        let resolver = ConfigResolver::new()
            .with_source(ExplicitSource::default().with(keys::USERNAME, "explicit-user"))
            .with_source(env(&[("WYZE_USERNAME", "env-user"), ("WYZE_PASSWORD", "env-pass")]))
            .with_source(file)
            .with_source(DefaultSource::new());

        assert_eq!(resolver.get(keys::USERNAME).as_deref(), Some("explicit-user"));
        assert_eq!(resolver.get(keys::PASSWORD).as_deref(), Some("env-pass"));
        assert_eq!(resolver.get(keys::APP_VERSION).as_deref(), Some("9.9.9"));
        assert_eq!(resolver.get(keys::APP_ID).as_deref(), Some(DEFAULT_APP_ID));
        assert_eq!(resolver.get("unknown_key"), None);
        assert_eq!(
            resolver.source_names(),
            vec!["explicit", "environment", "file", "default"]
        );
    }

    #[test]
    fn test_file_values_are_stringified() {
        let file = FileSource::parse(
            r#"
            [other]
            wyze_username = "ignored"

            [wyze]
            smartbridge_debug = true
            wyze_read_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(file.get(keys::DEBUG).as_deref(), Some("true"));
        assert_eq!(file.get(keys::READ_TIMEOUT).as_deref(), Some("30"));
        assert_eq!(file.get(keys::USERNAME), None);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let result = FileSource::parse("[wyze\nkey = ");
        assert!(matches!(result, Err(SmartbridgeError::Config(_))));
    }

    #[test]
    fn test_default_phone_id_is_stable_per_source() {
        let defaults = DefaultSource::new();
        assert_eq!(defaults.get(keys::PHONE_ID), defaults.get(keys::PHONE_ID));
        assert_ne!(DefaultSource::new().get(keys::PHONE_ID), defaults.get(keys::PHONE_ID));
    }

    #[test]
    fn test_resolve_provider_config() {
        let resolver = ConfigResolver::new()
            .with_source(env(&[
                ("WYZE_REFRESH_TOKEN", "refresh"),
                ("WYZE_CONNECT_TIMEOUT_SECS", "5"),
                ("SB_DEBUG", "1"),
            ]))
            .with_source(DefaultSource::new());

        let config = ProviderConfig::resolve(&resolver).unwrap();
        assert_eq!(config.app.app_name, "wyze");
        assert_eq!(config.credentials.refresh_token.as_deref(), Some("refresh"));
        assert!(!config.credentials.is_authenticated());
        assert_eq!(config.transport.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.transport.read_timeout, None);
        assert!(config.debug);
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let resolver = ConfigResolver::new()
            .with_source(ExplicitSource::default().with(keys::READ_TIMEOUT, "soon"));

        assert!(matches!(
            ProviderConfig::resolve(&resolver),
            Err(SmartbridgeError::Config(_))
        ));
    }

    #[test]
    fn test_password_is_redacted() {
        let mut config = ProviderConfig::new();
        config.password = Some("hunter2".to_string());
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
