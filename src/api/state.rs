//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::collector::{Collector, Session};
use crate::config::ApiConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Collector driving the per-language fetches
    pub collector: Arc<Collector>,
    /// Current collection session (shared with the collector)
    pub session: Arc<RwLock<Session>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState around a collector
    pub fn new(collector: Arc<Collector>, config: ApiConfig) -> Self {
        let session = collector.session();
        Self {
            collector,
            session,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
