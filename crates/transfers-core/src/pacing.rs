//! Pauses between page requests
//!
//! The scraper waits a fixed time between consecutive requests so the
//! source server is not hammered. The wait goes through `Pacer` so tests
//! can observe it without sleeping.

use std::future::Future;
use std::time::Duration;

/// Something that can wait for a given duration
pub trait Pacer {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Pacer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
