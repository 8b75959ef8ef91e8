//! Scoped store sessions
//!
//! Every operation acquires a [`Session`] on entry and lets it drop on exit.
//! Release happens in `Drop`, so it also runs on `?` returns, panics and
//! when the operation's future is cancelled.

use aws_sdk_s3::Client;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Session bookkeeping owned by the client
#[derive(Debug, Default)]
pub(crate) struct SessionCounters {
    opened: AtomicU64,
    live: AtomicUsize,
}

impl SessionCounters {
    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }
}

/// A client session bound to one bucket for the duration of one operation
pub struct Session<'a> {
    client: Client,
    bucket: &'a str,
    id: u64,
    counters: &'a SessionCounters,
}

impl<'a> Session<'a> {
    pub(crate) fn open(
        config: &aws_sdk_s3::Config,
        bucket: &'a str,
        counters: &'a SessionCounters,
    ) -> Self {
        let id = counters.opened.fetch_add(1, Ordering::SeqCst) + 1;
        counters.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(session = id, bucket, "Opened store session");

        Self {
            client: Client::from_conf(config.clone()),
            bucket,
            id,
            counters,
        }
    }

    /// The underlying SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        self.bucket
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(session = self.id, bucket = self.bucket, "Released store session");
    }
}
