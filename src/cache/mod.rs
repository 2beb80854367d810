//! Byte-bounded in-memory caching.
//!
//! This module provides the process-wide tile cache: a recency-ordered store
//! of opaque byte payloads, bounded by total payload size rather than entry
//! count. Each stored value carries a content fingerprint computed at
//! insertion, which the HTTP layer reuses as the response entity tag.
//!
//! The cache knows nothing about tiles, coordinates, or HTTP; it maps opaque
//! string keys to immutable byte blobs.

mod byte_cache;

pub use byte_cache::{ByteCache, CacheStatus};
