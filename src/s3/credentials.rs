//! Static access-key credentials
//!
//! The store is authenticated with a single access key / secret key pair
//! supplied through [`crate::settings::StoreSettings`]. No profile files,
//! SSO or role chains are consulted.

use aws_sdk_s3::config::Credentials;
use std::fmt;

/// Provider name reported to the SDK for credentials built here
const PROVIDER_NAME: &str = "s3-object-store-static";

/// Access key / secret key pair
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    access_key: String,
    secret_key: String,
}

impl StaticCredentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Both halves present
    pub fn is_complete(&self) -> bool {
        !self.access_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    /// Convert into SDK credentials (no session token, no expiry)
    pub fn to_sdk(&self) -> Credentials {
        Credentials::new(
            &self.access_key,
            &self.secret_key,
            None,
            None,
            PROVIDER_NAME,
        )
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .finish()
    }
}
