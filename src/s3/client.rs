//! Object store client for a single bucket

use crate::part_file::PartFile;
use crate::s3::error::StoreError;
use crate::s3::session::{Session, SessionCounters};
use crate::s3::transport;
use crate::s3::types::{object_key_for, size_string, DeletedObject, DownloadedObject, UploadedObject};
use crate::settings::StoreSettings;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;

/// Upload, download and delete objects in one bucket
///
/// Configuration is fixed at construction. Each operation opens its own
/// [`Session`] and releases it before returning.
pub struct ObjectStoreClient {
    config: aws_sdk_s3::Config,
    bucket_name: String,
    endpoint_url: String,
    sessions: SessionCounters,
}

impl ObjectStoreClient {
    /// Validate settings and build the SDK configuration. No requests are sent.
    pub async fn new(settings: StoreSettings) -> Result<Self, StoreError> {
        validate(&settings)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(settings.credentials.to_sdk())
            .endpoint_url(&settings.endpoint_url);

        if settings.accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification is disabled for {}",
                settings.endpoint_url
            );
            loader = loader.http_client(transport::insecure_http_client()?);
        }

        let sdk_config = loader.load().await;
        let config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style)
            .build();

        tracing::debug!(
            "Created store client for bucket {} at {}",
            settings.bucket_name,
            settings.endpoint_url
        );

        Ok(Self {
            config,
            bucket_name: settings.bucket_name,
            endpoint_url: settings.endpoint_url,
            sessions: SessionCounters::default(),
        })
    }

    /// Acquire a session; it is released when dropped
    pub fn session(&self) -> Session<'_> {
        Session::open(&self.config, &self.bucket_name, &self.sessions)
    }

    /// Upload a local file under its final path segment
    ///
    /// An existing object with the same key is overwritten.
    pub async fn upload(&self, local_path: impl AsRef<Path>) -> Result<UploadedObject, StoreError> {
        let local_path = local_path.as_ref();
        let key = object_key_for(local_path)?;

        let session = self.session();

        let metadata = tokio::fs::metadata(local_path)
            .await
            .map_err(|e| StoreError::io(local_path, e))?;
        if !metadata.is_file() {
            return Err(StoreError::io(
                local_path,
                std::io::Error::other("not a regular file"),
            ));
        }
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StoreError::io(local_path, std::io::Error::other(e)))?;

        let output = session
            .client()
            .put_object()
            .bucket(session.bucket())
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::from_sdk(e, &self.bucket_name, &key))?;

        tracing::info!(
            bucket = %self.bucket_name,
            key = %key,
            bytes = metadata.len(),
            "File {} ({}) has been uploaded to {}",
            key,
            size_string(metadata.len()),
            self.bucket_name
        );

        Ok(UploadedObject {
            key,
            size: metadata.len(),
            e_tag: output.e_tag().map(str::to_string),
        })
    }

    /// Download an object to `destination`, replacing it atomically
    ///
    /// The destination is left untouched if any step fails.
    pub async fn download(
        &self,
        key: &str,
        destination: impl AsRef<Path>,
    ) -> Result<DownloadedObject, StoreError> {
        let destination = destination.as_ref();
        let session = self.session();

        let output = session
            .client()
            .get_object()
            .bucket(session.bucket())
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::from_sdk(e, &self.bucket_name, key))?;

        let mut body = output.body;
        let mut part = PartFile::create(destination).await?;

        while let Some(chunk) = body.try_next().await.map_err(body_error)? {
            part.write_all(&chunk).await?;
        }

        let size = part.persist().await?;

        tracing::info!(
            bucket = %self.bucket_name,
            key = %key,
            path = ?destination,
            bytes = size,
            "File {} has been downloaded to {:?}",
            key,
            destination
        );

        Ok(DownloadedObject {
            key: key.to_string(),
            path: destination.to_path_buf(),
            size,
        })
    }

    /// Delete an object. Deleting a missing key succeeds.
    pub async fn delete(&self, key: &str) -> Result<DeletedObject, StoreError> {
        let session = self.session();

        let result = session
            .client()
            .delete_object()
            .bucket(session.bucket())
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => {}
            Err(e) => {
                let err = StoreError::from_sdk(e, &self.bucket_name, key);
                if !err.is_not_found() {
                    return Err(err);
                }
                tracing::debug!("Object {} was already absent from {}", key, self.bucket_name);
            }
        }

        tracing::info!(
            bucket = %self.bucket_name,
            key = %key,
            "File {} has been deleted from {}",
            key,
            self.bucket_name
        );

        Ok(DeletedObject {
            key: key.to_string(),
        })
    }

    /// Check whether an object exists
    pub async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let session = self.session();

        let result = session
            .client()
            .head_object()
            .bucket(session.bucket())
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = StoreError::from_sdk(e, &self.bucket_name, key);
                if err.is_not_found() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint_url
    }

    /// Sessions currently held by in-flight operations
    pub fn live_sessions(&self) -> usize {
        self.sessions.live()
    }

    /// Sessions opened since construction
    pub fn sessions_opened(&self) -> u64 {
        self.sessions.opened()
    }
}

fn body_error(err: aws_sdk_s3::primitives::ByteStreamError) -> StoreError {
    StoreError::Network {
        message: format!("response body interrupted: {}", DisplayErrorContext(&err)),
    }
}

fn validate(settings: &StoreSettings) -> Result<(), StoreError> {
    if !settings.credentials.is_complete() {
        return Err(StoreError::InvalidConfig(
            "access key and secret key must be non-empty".to_string(),
        ));
    }
    if settings.bucket_name.trim().is_empty() {
        return Err(StoreError::InvalidConfig(
            "bucket name must be non-empty".to_string(),
        ));
    }
    if settings.region.trim().is_empty() {
        return Err(StoreError::InvalidConfig("region must be non-empty".to_string()));
    }

    let endpoint = url::Url::parse(&settings.endpoint_url).map_err(|e| {
        StoreError::InvalidConfig(format!("invalid endpoint {:?}: {}", settings.endpoint_url, e))
    })?;
    match endpoint.scheme() {
        "http" | "https" => Ok(()),
        other => Err(StoreError::InvalidConfig(format!(
            "endpoint scheme must be http or https, got {:?}",
            other
        ))),
    }
}
