//! Async client for a single bucket on an S3-compatible object store
//!
//! Settings come from the environment via [`settings::StoreSettings`], and
//! [`s3::ObjectStoreClient`] performs uploads, downloads and deletes against
//! the configured bucket.

mod part_file;
pub mod s3;
pub mod settings;
pub mod smoke;
