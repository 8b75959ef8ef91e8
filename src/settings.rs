//! Store settings loaded from the environment
//!
//! Values are read once at startup, optionally from a `.env` file in the
//! working directory, and handed to [`crate::s3::ObjectStoreClient`] by value.
//!
//! | variable               | required | default                          |
//! |------------------------|----------|----------------------------------|
//! | `ACCESS_KEY`           | yes      |                                  |
//! | `SECRET_KEY`           | yes      |                                  |
//! | `BUCKET_NAME`          | yes      |                                  |
//! | `ENDPOINT_URL`         | no       | `https://s3.storage.selcloud.ru` |
//! | `REGION`               | no       | `ru-1`                           |
//! | `FORCE_PATH_STYLE`     | no       | `true`                           |
//! | `ACCEPT_INVALID_CERTS` | no       | `false`                          |

use crate::s3::credentials::StaticCredentials;
use thiserror::Error;

pub const DEFAULT_ENDPOINT_URL: &str = "https://s3.storage.selcloud.ru";
pub const DEFAULT_REGION: &str = "ru-1";

/// Errors raised while loading settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("required setting {0} is missing or empty")]
    Missing(&'static str),

    #[error("setting {var} has invalid boolean value {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Connection settings for a single bucket
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub credentials: StaticCredentials,
    pub endpoint_url: String,
    pub bucket_name: String,
    pub region: String,

    /// Address buckets as `endpoint/bucket/key` rather than `bucket.endpoint/key`
    pub force_path_style: bool,

    /// Skip TLS certificate and hostname verification. Test setups only.
    pub accept_invalid_certs: bool,
}

impl StoreSettings {
    /// Settings with the default endpoint, region and flags
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            credentials: StaticCredentials::new(access_key, secret_key),
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            bucket_name: bucket_name.into(),
            region: DEFAULT_REGION.to_string(),
            force_path_style: true,
            accept_invalid_certs: false,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Load settings from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self, SettingsError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => tracing::debug!("No .env file found"),
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }

        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SettingsError::Missing(var))
        };
        let optional = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let flag = |var: &'static str, default: bool| match lookup(var) {
            Some(value) if !value.trim().is_empty() => parse_flag(var, &value),
            _ => Ok(default),
        };

        let settings = Self {
            credentials: StaticCredentials::new(required("ACCESS_KEY")?, required("SECRET_KEY")?),
            bucket_name: required("BUCKET_NAME")?,
            endpoint_url: optional("ENDPOINT_URL", DEFAULT_ENDPOINT_URL),
            region: optional("REGION", DEFAULT_REGION),
            force_path_style: flag("FORCE_PATH_STYLE", true)?,
            accept_invalid_certs: flag("ACCEPT_INVALID_CERTS", false)?,
        };

        tracing::info!(
            "Loaded settings: endpoint={}, bucket={}, region={}, accept_invalid_certs={}",
            settings.endpoint_url,
            settings.bucket_name,
            settings.region,
            settings.accept_invalid_certs
        );

        Ok(settings)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
