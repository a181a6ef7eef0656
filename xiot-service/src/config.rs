//! Session configuration
//!
//! Loaded from an optional TOML file, then overridden by `XIOT_`-prefixed
//! environment variables (`XIOT_HOST`, `XIOT_PORT`, `XIOT_SERIAL_NUMBER`, ...).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use xiot_core::{XiotError, XiotResult};

/// Identity and key material a device session is created from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceIdentity {
    pub serial_number: String,
    pub product_id: u32,
    pub product_version: u32,
    /// Base64 device long-term public key
    pub device_ltpk: String,
    /// Base64 device long-term secret key
    pub device_ltsk: String,
    /// Base64 server long-term public key
    pub server_ltpk: String,
}

/// Complete session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub serial_number: String,
    pub product_id: u32,
    pub product_version: u32,
    pub device_ltpk: String,
    pub device_ltsk: String,
    pub server_ltpk: String,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Seconds between keepalive pings
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_uri() -> String {
    "/endpoint".to_string()
}

fn default_keepalive_secs() -> u64 {
    30
}

impl ServiceConfig {
    /// Load configuration from `path` (if any) with environment overrides
    pub fn load(path: Option<&Path>) -> XiotResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("XIOT").try_parsing(true))
            .build()
            .map_err(config_error)?;
        Self::from_settings(settings)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(toml: &str) -> XiotResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(config_error)?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> XiotResult<Self> {
        let config: ServiceConfig = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> XiotResult<()> {
        if self.serial_number.trim().is_empty() {
            return Err(XiotError::Config("serial_number cannot be empty".into()));
        }

        if self.host.trim().is_empty() {
            return Err(XiotError::Config("host cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(XiotError::Config("port cannot be 0".into()));
        }

        if self.keepalive_secs == 0 {
            return Err(XiotError::Config(
                "keepalive_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity {
            serial_number: self.serial_number.clone(),
            product_id: self.product_id,
            product_version: self.product_version,
            device_ltpk: self.device_ltpk.clone(),
            device_ltsk: self.device_ltsk.clone(),
            server_ltpk: self.server_ltpk.clone(),
        }
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

fn config_error(e: config::ConfigError) -> XiotError {
    XiotError::Config(e.to_string())
}
