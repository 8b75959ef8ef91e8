//! Error types for object store operations

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a single store operation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist
    #[error("object {key:?} not found in bucket {bucket:?}")]
    NotFound { bucket: String, key: String },

    /// The bucket does not exist
    #[error("bucket {bucket:?} not found")]
    BucketNotFound { bucket: String },

    /// Credentials rejected or not permitted
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// Request never completed: connect failure, timeout, broken body stream
    #[error("network error: {message}")]
    Network { message: String },

    /// Any other error response from the store
    #[error("store returned {code} (HTTP {status}): {message}")]
    Service {
        code: String,
        message: String,
        status: u16,
    },

    /// Local filesystem failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No object key can be derived from the path
    #[error("cannot derive an object key from {path:?}")]
    InvalidKey { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Classify an SDK failure for an operation on `bucket`/`key`
    pub(crate) fn from_sdk<E>(err: SdkError<E>, bucket: &str, key: &str) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        match &err {
            SdkError::ServiceError(ctx) => {
                let status = ctx.raw().status().as_u16();
                let code = ctx.err().code();
                let message = ctx
                    .err()
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(ctx.err()).to_string());
                classify(status, code, message, bucket, key)
            }
            SdkError::ConstructionFailure(_) => {
                StoreError::InvalidConfig(DisplayErrorContext(&err).to_string())
            }
            _ => StoreError::Network {
                message: DisplayErrorContext(&err).to_string(),
            },
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The object (not the bucket) is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Network { .. })
    }

    /// Short stable label, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::BucketNotFound { .. } => "bucket_not_found",
            StoreError::AccessDenied { .. } => "access_denied",
            StoreError::Network { .. } => "network",
            StoreError::Service { .. } => "service",
            StoreError::Io { .. } => "io",
            StoreError::InvalidKey { .. } => "invalid_key",
            StoreError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Map an error response to a [`StoreError`] by code first, then by HTTP status
pub(crate) fn classify(
    status: u16,
    code: Option<&str>,
    message: String,
    bucket: &str,
    key: &str,
) -> StoreError {
    match code {
        Some("NoSuchBucket") => {
            return StoreError::BucketNotFound {
                bucket: bucket.to_string(),
            }
        }
        Some("NoSuchKey") | Some("NotFound") => {
            return StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        }
        Some("AccessDenied") | Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") => {
            return StoreError::AccessDenied { message }
        }
        _ => {}
    }

    match status {
        404 => StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        401 | 403 => StoreError::AccessDenied { message },
        _ => StoreError::Service {
            code: code.unwrap_or("Unknown").to_string(),
            message,
            status,
        },
    }
}
