//! Integration tests for the object store client using MinIO via testcontainers
//!
//! These tests require Docker to be running and use the testcontainers crate
//! to spin up a MinIO instance for realistic S3 testing.
//!
//! Run with: cargo test --test s3_integration
//!
//! Note: Tests are conditionally skipped if Docker is not available.

use s3_object_store::s3::{ObjectStoreClient, StoreError};
use s3_object_store::settings::StoreSettings;
use s3_object_store::smoke;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::minio::MinIO;

/// MinIO default credentials
const MINIO_ACCESS_KEY: &str = "minioadmin";
const MINIO_SECRET_KEY: &str = "minioadmin";

/// Test helper to check if Docker is available
fn docker_available() -> bool {
    std::process::Command::new("docker")
        .arg("info")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

async fn start_minio() -> ContainerAsync<MinIO> {
    let container = MinIO::default()
        .with_env_var("MINIO_ROOT_USER", MINIO_ACCESS_KEY)
        .with_env_var("MINIO_ROOT_PASSWORD", MINIO_SECRET_KEY)
        .start()
        .await
        .expect("Failed to start MinIO container");

    // Wait for MinIO to be ready
    tokio::time::sleep(Duration::from_secs(2)).await;

    container
}

/// Helper to get MinIO endpoint URL from container
async fn get_minio_endpoint(container: &ContainerAsync<MinIO>) -> String {
    let host = container.get_host().await.expect("Failed to get container host");
    let port = container.get_host_port_ipv4(9000).await.expect("Failed to get MinIO port");
    format!("http://{}:{}", host, port)
}

/// Create a client for `bucket` on MinIO and make sure the bucket exists
async fn create_minio_client(container: &ContainerAsync<MinIO>, bucket: &str) -> ObjectStoreClient {
    let endpoint = get_minio_endpoint(container).await;
    let settings = StoreSettings::new(MINIO_ACCESS_KEY, MINIO_SECRET_KEY, bucket)
        .with_endpoint(endpoint)
        .with_region("us-east-1");

    let client = ObjectStoreClient::new(settings)
        .await
        .expect("Failed to create MinIO client");

    let session = client.session();
    session
        .client()
        .create_bucket()
        .bucket(session.bucket())
        .send()
        .await
        .expect("Failed to create bucket");
    drop(session);

    client
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write local file");
    path
}

/// Upload then download returns identical bytes under the derived key
#[tokio::test]
async fn test_upload_and_download_round_trip() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "round-trip").await;
    let dir = TempDir::new().unwrap();

    let nested = dir.path().join("users").join("images");
    std::fs::create_dir_all(&nested).unwrap();
    let contents = b"\x89PNG\r\n\x1a\nnot really an image";
    let source = write_file(&nested, "some.png", contents);

    let uploaded = client.upload(&source).await.expect("Failed to upload");
    assert_eq!(uploaded.key, "some.png");
    assert_eq!(uploaded.size, contents.len() as u64);
    assert!(uploaded.e_tag.is_some());

    let dest = dir.path().join("copy.png");
    let downloaded = client.download("some.png", &dest).await.expect("Failed to download");
    assert_eq!(downloaded.size, contents.len() as u64);
    assert_eq!(downloaded.path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), std::fs::read(&source).unwrap());

    assert_eq!(client.live_sessions(), 0);
    assert_eq!(client.sessions_opened(), 3);
}

/// Test handling large files
#[tokio::test]
async fn test_large_file_upload_download() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "large-file-test").await;
    let dir = TempDir::new().unwrap();

    // Create 1 MB of test data
    let large_data: Vec<u8> = (0..1024 * 1024).map(|i| (i % 256) as u8).collect();
    let source = write_file(dir.path(), "large.bin", &large_data);

    client.upload(&source).await.unwrap();

    let dest = dir.path().join("large-copy.bin");
    let downloaded = client.download("large.bin", &dest).await.unwrap();

    assert_eq!(downloaded.size, large_data.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), large_data);
}

/// Second upload to the same key replaces the first
#[tokio::test]
async fn test_upload_overwrites_existing_key() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "overwrite-test").await;
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let first = write_file(first_dir.path(), "report.txt", b"first version");
    let second = write_file(second_dir.path(), "report.txt", b"second version, longer");

    client.upload(&first).await.unwrap();
    client.upload(&second).await.unwrap();

    let dest = first_dir.path().join("fetched.txt");
    client.download("report.txt", &dest).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"second version, longer");
}

/// Delete removes the object and a second delete still succeeds
#[tokio::test]
async fn test_delete_is_idempotent() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "delete-test").await;
    let dir = TempDir::new().unwrap();

    let source = write_file(dir.path(), "to-delete.txt", b"Delete me");
    client.upload(&source).await.unwrap();
    assert!(client.exists("to-delete.txt").await.unwrap());

    let deleted = client.delete("to-delete.txt").await.expect("Failed to delete");
    assert_eq!(deleted.key, "to-delete.txt");
    assert!(!client.exists("to-delete.txt").await.unwrap());

    client
        .delete("to-delete.txt")
        .await
        .expect("Second delete should succeed");
    client
        .delete("never-existed.txt")
        .await
        .expect("Deleting a missing key should succeed");
}

/// Download after delete reports not-found and leaves the destination alone
#[tokio::test]
async fn test_download_missing_object_is_not_found() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "missing-test").await;
    let dir = TempDir::new().unwrap();

    let source = write_file(dir.path(), "test.jpg", b"jpeg bytes");
    client.upload(&source).await.unwrap();
    client.delete("test.jpg").await.unwrap();

    // Fresh destination is never created
    let fresh = dir.path().join("received_file.jpg");
    let err = client.download("test.jpg", &fresh).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {:?}", err);
    assert!(!fresh.exists());

    // Existing destination is not truncated
    let existing = write_file(dir.path(), "keep.jpg", b"previous download");
    let err = client.download("test.jpg", &existing).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous download");

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["keep.jpg", "test.jpg"]);
}

/// Operations against a bucket that does not exist are classified
#[tokio::test]
async fn test_missing_bucket() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let endpoint = get_minio_endpoint(&container).await;
    let settings = StoreSettings::new(MINIO_ACCESS_KEY, MINIO_SECRET_KEY, "no-such-bucket")
        .with_endpoint(endpoint)
        .with_region("us-east-1");
    let client = ObjectStoreClient::new(settings).await.unwrap();
    let dir = TempDir::new().unwrap();

    let source = write_file(dir.path(), "file.txt", b"data");
    let err = client.upload(&source).await.unwrap_err();
    assert!(matches!(err, StoreError::BucketNotFound { .. }), "unexpected error: {:?}", err);

    let err = client.delete("file.txt").await.unwrap_err();
    assert_eq!(err.kind(), "bucket_not_found");
}

/// Wrong credentials are reported as access denied
#[tokio::test]
async fn test_wrong_credentials() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    create_minio_client(&container, "auth-test").await;

    let endpoint = get_minio_endpoint(&container).await;
    let settings = StoreSettings::new(MINIO_ACCESS_KEY, "not-the-secret", "auth-test")
        .with_endpoint(endpoint)
        .with_region("us-east-1");
    let client = ObjectStoreClient::new(settings).await.unwrap();
    let dir = TempDir::new().unwrap();

    let source = write_file(dir.path(), "file.txt", b"data");
    let err = client.upload(&source).await.unwrap_err();
    assert_eq!(err.kind(), "access_denied", "unexpected error: {:?}", err);
}

/// Test special characters in keys
#[tokio::test]
async fn test_special_characters_in_keys() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "special-chars").await;
    let dir = TempDir::new().unwrap();

    let special_keys = vec![
        "file with spaces.txt",
        "file-with-dashes.txt",
        "file_with_underscores.txt",
        "file.multiple.dots.txt",
        "UPPERCASE.TXT",
    ];

    for key in &special_keys {
        let source = write_file(dir.path(), key, format!("Content for {}", key).as_bytes());
        let uploaded = client.upload(&source).await.unwrap();
        assert_eq!(&uploaded.key, key);
    }

    for key in &special_keys {
        let dest = dir.path().join(format!("out-{}", key));
        client.download(key, &dest).await.unwrap();
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content, format!("Content for {}", key));
    }
}

/// The full smoke sequence succeeds and cleans up after itself
#[tokio::test]
async fn test_smoke_sequence() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "smoke-test").await;
    let dir = TempDir::new().unwrap();

    let bytes = b"\xff\xd8\xff\xe0 fake jpeg payload";
    let source = write_file(dir.path(), smoke::DEFAULT_SOURCE, bytes);
    let dest = dir.path().join(smoke::DEFAULT_DESTINATION);

    let report = smoke::run(&client, &source, &dest).await;

    assert!(report.is_success(), "failures: {:?}", report.failures().collect::<Vec<_>>());
    let names: Vec<&str> = report.steps.iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["upload", "download", "delete"]);
    assert_eq!(std::fs::read(&dest).unwrap(), bytes);
    assert!(!client.exists(smoke::DEFAULT_SOURCE).await.unwrap());
}

/// A failing step does not stop the rest of the sequence
#[tokio::test]
async fn test_smoke_sequence_continues_after_failure() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let container = start_minio().await;
    let client = create_minio_client(&container, "smoke-failure").await;
    let dir = TempDir::new().unwrap();

    // Source file is never created
    let source = dir.path().join(smoke::DEFAULT_SOURCE);
    let dest = dir.path().join(smoke::DEFAULT_DESTINATION);

    let report = smoke::run(&client, &source, &dest).await;

    assert!(!report.is_success());
    let failed: Vec<(&str, &str)> = report
        .failures()
        .map(|s| (s.name, s.error.as_ref().map(|e| e.kind()).unwrap_or("")))
        .collect();
    assert_eq!(failed, vec![("upload", "io"), ("download", "not_found")]);
    assert_eq!(report.steps.len(), 3);
    assert!(!dest.exists());
}
