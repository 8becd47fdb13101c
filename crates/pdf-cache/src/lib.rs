//! Download-once file cache for remote PDF documents
//!
//! Fetches a document over HTTP(S) the first time it is requested, stores it
//! under a key derived from the URL's last path segment, and serves every
//! later request for that key straight from disk.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod types;
pub mod viewer;

pub use cache::DocumentCache;
pub use config::CacheConfig;
pub use error::{FetchError, Result};
pub use key::{cache_key, FALLBACK_KEY};
pub use types::{CacheStats, CachedDocument};
pub use viewer::{
    DocumentView, DocumentViewer, LoadInfo, OnLoad, ViewState, ViewerError, ViewerOptions,
};
