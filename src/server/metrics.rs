//! Request counters for the status endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use http::Method;
use serde::Serialize;
use tokio::sync::RwLock;

/// Point-in-time copy of the request counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub status: HashMap<u16, u64>,
    pub methods: HashMap<String, u64>,
    pub start: DateTime<Utc>,
}

#[derive(Default)]
struct Counters {
    requests: u64,
    status: HashMap<u16, u64>,
    methods: HashMap<String, u64>,
}

/// Totals since process start: request count, responses per status code,
/// requests per method.
pub struct Metrics {
    counters: RwLock<Counters>,
    start: DateTime<Utc>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
            start: Utc::now(),
        }
    }

    /// Count one handled request.
    pub async fn record(&self, method: &Method, status: u16) {
        let mut counters = self.counters.write().await;
        counters.requests += 1;
        *counters.status.entry(status).or_insert(0) += 1;
        *counters.methods.entry(method.to_string()).or_insert(0) += 1;
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.counters.read().await;
        MetricsSnapshot {
            requests: counters.requests,
            status: counters.status.clone(),
            methods: counters.methods.clone(),
            start: self.start,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
