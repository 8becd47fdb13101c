//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A document available on local disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub key: String,
    pub path: PathBuf,
    pub size: u64,
    /// Served from disk without touching the network
    pub from_cache: bool,
    pub created_at: DateTime<Utc>,
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub downloads: u64,
    pub failures: u64,
    /// Callers that joined a download already in flight for their key
    pub coalesced: u64,
}
