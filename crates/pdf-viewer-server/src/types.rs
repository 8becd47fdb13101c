//! Core types for the PDF viewer server

use pdf_cache::{CacheConfig, CacheStats};
use serde::Serialize;

/// Document shown on the `show_pdf` route unless `DOCUMENT_URL` says otherwise
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://source.android.com/docs/compatibility/5.0/android-5.0-cdd.pdf";

/// Configuration for the viewer server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cache: CacheConfig,
    pub document_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            cache: CacheConfig::default(),
            document_url: DEFAULT_DOCUMENT_URL.to_string(),
        }
    }
}

/// Screens reachable from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    ShowPdf,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Home, Route::ShowPdf];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::ShowPdf => "/show_pdf",
        }
    }
}

/// Landing screen
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub route: Route,
    pub document_url: String,
    /// Where the "show PDF" action navigates to
    pub next: &'static str,
    pub routes: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}
