//! Upload / download / delete smoke test against a live bucket

use crate::s3::{object_key_for, ObjectStoreClient, StoreError};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "test.jpg";
pub const DEFAULT_DESTINATION: &str = "received_file.jpg";

/// Outcome of one step of the sequence
#[derive(Debug)]
pub struct SmokeStep {
    pub name: &'static str,
    pub error: Option<StoreError>,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    pub steps: Vec<SmokeStep>,
}

impl SmokeReport {
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.error.is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SmokeStep> {
        self.steps.iter().filter(|s| s.error.is_some())
    }

    fn record<T>(&mut self, name: &'static str, result: Result<T, StoreError>) {
        let error = match result {
            Ok(_) => None,
            Err(e) => {
                tracing::error!(step = name, kind = e.kind(), "Smoke step {} failed: {}", name, e);
                Some(e)
            }
        };
        self.steps.push(SmokeStep { name, error });
    }
}

/// Upload `source`, download it back to `destination`, then delete it
///
/// Steps run in order and a failed step does not stop the ones after it.
pub async fn run(client: &ObjectStoreClient, source: &Path, destination: &Path) -> SmokeReport {
    let mut report = SmokeReport::default();

    let key = match object_key_for(source) {
        Ok(key) => key,
        Err(e) => {
            report.record::<()>("upload", Err(e));
            return report;
        }
    };

    report.record("upload", client.upload(source).await);
    report.record("download", client.download(&key, destination).await);
    report.record("delete", client.delete(&key).await);

    report
}

/// Run with [`DEFAULT_SOURCE`] and [`DEFAULT_DESTINATION`] in the working directory
pub async fn run_default(client: &ObjectStoreClient) -> SmokeReport {
    run(
        client,
        &PathBuf::from(DEFAULT_SOURCE),
        &PathBuf::from(DEFAULT_DESTINATION),
    )
    .await
}
