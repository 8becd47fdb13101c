//! Cache configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where documents are cached and how they are fetched
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Process-private cache root; documents live in `cache_root/dir_name`
    pub cache_root: PathBuf,
    pub dir_name: String,
    /// Whole-request timeout. `None` keeps the HTTP client's default behavior.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl CacheConfig {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Directory holding the cached documents
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_root.join(&self.dir_name)
    }

    /// Sibling of the cache directory where downloads are written before
    /// being moved into place
    pub fn tmp_dir(&self) -> PathBuf {
        self.cache_root.join(format!("{}.tmp", self.dir_name))
    }

    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let cache_root = env::var("PDF_CACHE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./cache"));

        let timeout = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            cache_root,
            timeout,
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from("./cache"),
            dir_name: "pdf_cache".to_string(),
            timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}
