//! HTTP transport overrides for the SDK

use crate::s3::error::StoreError;
use aws_sdk_s3::config::SharedHttpClient;
use aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder;
use hyper::client::HttpConnector;
use hyper_tls::HttpsConnector;
use native_tls::TlsConnector;

/// HTTP client that accepts any server certificate and hostname
///
/// Only installed when `accept_invalid_certs` is set. Without it the SDK's
/// default verifying HTTPS client is used.
pub(crate) fn insecure_http_client() -> Result<SharedHttpClient, StoreError> {
    let tls = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| StoreError::InvalidConfig(format!("failed to build TLS connector: {}", e)))?;

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let https = HttpsConnector::from((http, tls.into()));

    Ok(HyperClientBuilder::new().build(https))
}
