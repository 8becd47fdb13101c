//! Download-once document cache backed by a local directory

use crate::config::CacheConfig;
use crate::error::{FetchError, Result};
use crate::key::cache_key;
use crate::types::{CacheStats, CachedDocument};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

/// Upper bound on distinct keys tracked while their downloads are running
const MAX_IN_FLIGHT: u64 = 1024;

/// Fetches remote documents once and serves them from disk afterwards.
///
/// A cache hit is decided purely by the presence of `<cache_dir>/<key>`; the
/// file is never re-validated against the remote resource.
pub struct DocumentCache {
    /// Directory where documents are stored
    cache_dir: PathBuf,
    /// Sibling directory for downloads still being written
    tmp_dir: PathBuf,
    client: Client,
    /// Downloads currently running, keyed by cache key. Entries are dropped as
    /// soon as the download settles so the filesystem stays authoritative.
    in_flight: Cache<String, CachedDocument>,
    hits: AtomicU64,
    downloads: AtomicU64,
    failures: AtomicU64,
    coalesced: AtomicU64,
}

impl DocumentCache {
    /// Create a new document cache
    pub fn new(config: CacheConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            cache_dir: config.cache_dir(),
            tmp_dir: config.tmp_dir(),
            client,
            in_flight: Cache::new(MAX_IN_FLIGHT),
            hits: AtomicU64::new(0),
            downloads: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Ensure the cache directories exist and clear temp files left behind by
    /// downloads that were abandoned mid-stream
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        fs::create_dir_all(&self.tmp_dir).await?;

        let mut dir = fs::read_dir(&self.tmp_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            debug!(file = ?path, "Removing stale partial download");
            if let Err(e) = fs::remove_file(&path).await {
                warn!(file = ?path, error = %e, "Failed to remove partial download");
            }
        }

        info!(cache_dir = ?self.cache_dir, "Cache initialized");
        Ok(())
    }

    /// Return a local copy of the document, or `None` if it cannot be had.
    ///
    /// Every failure is logged and collapsed into `None`.
    pub async fn fetch(&self, source: Option<&str>) -> Option<CachedDocument> {
        match self.try_fetch(source).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(source = source.unwrap_or("<none>"), error = %e, "Document unavailable");
                None
            }
        }
    }

    /// Return a local copy of the document, downloading it on first use.
    pub async fn try_fetch(&self, source: Option<&str>) -> Result<CachedDocument> {
        let result = self.resolve(source).await;
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    async fn resolve(&self, source: Option<&str>) -> Result<CachedDocument> {
        fs::create_dir_all(&self.cache_dir).await?;
        fs::create_dir_all(&self.tmp_dir).await?;

        let key = cache_key(source);
        if let Some(doc) = self.lookup(&key).await? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache hit");
            return Ok(doc);
        }

        let source = source.filter(|s| !s.is_empty()).ok_or(FetchError::NoSource)?;
        let url = parse_source(source)?;

        // Disk already missed, so any value still stored for this key is left
        // over from a load whose caller went away before clearing it
        if let Some(stale) = self.in_flight.get(&key).await {
            if !fs::try_exists(&stale.path).await.unwrap_or(false) {
                self.in_flight.invalidate(&key).await;
            }
        }

        let loaded_here = AtomicBool::new(false);
        let result = self
            .in_flight
            .try_get_with(key.clone(), async {
                loaded_here.store(true, Ordering::Relaxed);
                // Another caller may have finished this key between our lookup
                // and winning the in-flight slot
                match self.lookup(&key).await {
                    Ok(Some(doc)) => {
                        self.hits.fetch_add(1, Ordering::Relaxed);
                        Ok(doc)
                    }
                    Ok(None) => self.download(&url, &key).await,
                    Err(e) => Err(e),
                }
            })
            .await;

        if loaded_here.load(Ordering::Relaxed) {
            self.in_flight.invalidate(&key).await;
        } else {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Joined in-flight download");
        }

        result.map_err(|e| (*e).clone())
    }

    /// Look for an existing file under `key`
    async fn lookup(&self, key: &str) -> Result<Option<CachedDocument>> {
        let path = self.cache_dir.join(key);
        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let created_at = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(CachedDocument {
            key: key.to_string(),
            path,
            size: meta.len(),
            from_cache: true,
            created_at,
        }))
    }

    /// Download `url` into `<cache_dir>/<key>`.
    ///
    /// The body is written to `<tmp_dir>/<key>.part` first and renamed into
    /// place only after it has been fully flushed, so no path under the cache
    /// directory ever holds a partial document.
    async fn download(&self, url: &Url, key: &str) -> Result<CachedDocument> {
        debug!(url = %url, key = %key, "Cache miss, downloading");

        let response = self.client.get(url.clone()).send().await?;

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), url = %url, "Failed to fetch document");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let path = self.cache_dir.join(key);
        let part_path = self.tmp_dir.join(format!("{}.part", key));

        let size = match write_body(response, &part_path).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&part_path, &path).await {
            let _ = fs::remove_file(&part_path).await;
            return Err(e.into());
        }

        self.downloads.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, size, "Document cached");

        Ok(CachedDocument {
            key: key.to_string(),
            path,
            size,
            from_cache: false,
            created_at: Utc::now(),
        })
    }

    /// Get current cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }
}

fn parse_source(source: &str) -> Result<Url> {
    let url = Url::parse(source)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme: {}",
            other
        ))),
    }
}

/// Stream the response body into `path`, returning the number of bytes written
async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut size = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(size)
}
