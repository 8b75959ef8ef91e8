//! S3-compatible object store access
//!
//! - [`client::ObjectStoreClient`] - upload, download and delete in one bucket
//! - [`session::Session`] - scoped per-operation client session
//! - [`credentials::StaticCredentials`] - access key / secret key pair
//! - [`error::StoreError`] - classified operation failures

pub mod client;
pub mod credentials;
pub mod error;
pub mod session;
mod transport;
pub mod types;

// Re-export commonly used types
pub use client::ObjectStoreClient;
pub use credentials::StaticCredentials;
pub use error::StoreError;
pub use session::Session;
pub use types::{object_key_for, DeletedObject, DownloadedObject, UploadedObject};
