//! Size-bounded LRU cache for immutable byte payloads.
//!
//! Tiles in an MBTiles package are already compressed, so the cache stores
//! the payload bytes exactly as fetched and tracks capacity in bytes rather
//! than entries. Each payload is fingerprinted with SHA-256 at insertion;
//! the fingerprint is returned from [`ByteCache::set`] and alongside every
//! hit so callers never rehash the same bytes.
//!
//! # Eviction
//!
//! Eviction is strict recency order and happens inline with `set`: after an
//! insertion pushes the total size over capacity, least-recently-used
//! entries are popped until the total fits again. There is no background
//! reclaim and no per-entry expiry; recency is the only eviction signal.
//!
//! # Thread Safety
//!
//! A single `RwLock` guards both the recency order and the size counter, so
//! [`ByteCache::status`] always observes a coherent count/size pair. `get`
//! takes the write lock because promoting an entry mutates recency order;
//! `exists` and `status` are pure readers.

use bytes::Bytes;
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Point-in-time view of the cache, exposed on the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// Number of resident entries
    pub elements: usize,

    /// Total payload bytes currently held
    pub size: u64,

    /// Configured capacity in bytes
    pub max_size: u64,
}

/// One cached payload and its content fingerprint.
///
/// The fingerprint is always the SHA-256 of the bytes stored next to it;
/// both fields are written together under the cache lock and never observed
/// out of sync.
struct CacheEntry {
    data: Bytes,
    fingerprint: String,
}

/// Recency order, key index, and size accounting under one lock.
struct Inner {
    entries: LruCache<String, CacheEntry>,
    size: u64,
}

/// In-memory LRU cache bounded by total payload size.
///
/// Constructed once at startup with a fixed byte capacity and shared across
/// request handlers via `Arc`. A capacity of zero is legal and degenerates
/// to a near-always-miss cache (every insertion is evicted again before
/// `set` returns).
pub struct ByteCache {
    inner: RwLock<Inner>,
    max_size: u64,
}

impl ByteCache {
    /// Create a cache that holds at most `max_size` payload bytes.
    pub fn new(max_size: u64) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: LruCache::unbounded(),
                size: 0,
            }),
            max_size,
        }
    }

    /// Insert or replace the entry for `key`, returning its fingerprint.
    ///
    /// The entry becomes most-recently-used. Replacing an existing key
    /// subtracts the old payload size before the new one is accounted, then
    /// least-recently-used entries are evicted until the total size fits the
    /// capacity again. A value larger than the whole cache evicts every
    /// other entry and finally itself, so `size <= max_size` holds whenever
    /// this method returns.
    pub async fn set(&self, key: impl Into<String>, data: Bytes) -> String {
        let fingerprint = fingerprint(&data);
        let new_size = data.len() as u64;

        let mut inner = self.inner.write().await;

        let entry = CacheEntry {
            data,
            fingerprint: fingerprint.clone(),
        };
        if let Some(old) = inner.entries.put(key.into(), entry) {
            inner.size -= old.data.len() as u64;
        }
        inner.size += new_size;

        while inner.size > self.max_size {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.size -= evicted.data.len() as u64,
                None => break,
            }
        }

        fingerprint
    }

    /// Fetch the payload and fingerprint for `key`, or `None` if absent.
    ///
    /// A hit promotes the entry to most-recently-used.
    pub async fn get(&self, key: &str) -> Option<(Bytes, String)> {
        let mut inner = self.inner.write().await;
        inner
            .entries
            .get(key)
            .map(|entry| (entry.data.clone(), entry.fingerprint.clone()))
    }

    /// Membership check. Does not touch recency order.
    pub async fn exists(&self, key: &str) -> bool {
        let inner = self.inner.read().await;
        inner.entries.contains(key)
    }

    /// Remove the entry for `key` if present, returning its payload.
    pub async fn remove(&self, key: &str) -> Option<Bytes> {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.entries.pop(key) {
            inner.size -= entry.data.len() as u64;
            Some(entry.data)
        } else {
            None
        }
    }

    /// Drop all entries and reset the size accounting.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.size = 0;
    }

    /// Coherent snapshot of element count, held bytes, and capacity.
    pub async fn status(&self) -> CacheStatus {
        let inner = self.inner.read().await;
        CacheStatus {
            elements: inner.entries.len(),
            size: inner.size,
            max_size: self.max_size,
        }
    }

    /// Number of resident entries.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.entries.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        let inner = self.inner.read().await;
        inner.entries.is_empty()
    }

    /// Configured capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.max_size
    }
}

/// Lowercase hex SHA-256 of a payload, used as the entity tag.
fn fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// =============================================================================
// Tests
// =============================================================================
