//! Document viewer seam and the view that drives one fetch-and-display flow

use crate::cache::DocumentCache;
use crate::types::CachedDocument;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Rendering options handed to the viewer along with the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Draw a draggable scroll handle next to the pages
    pub scroll_handle: bool,
    pub antialiasing: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            scroll_handle: true,
            antialiasing: true,
        }
    }
}

/// Reported by the viewer once the document has been rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadInfo {
    pub size: u64,
}

/// Load-completion callback
pub type OnLoad = Box<dyn FnOnce(LoadInfo) + Send>;

#[derive(Debug)]
pub enum ViewerError {
    Io(Box<std::io::Error>),
    Render(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Io(err) => write!(f, "IO error: {}", err),
            ViewerError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(Box::new(err))
    }
}

/// Component that renders a local document file.
///
/// `load` is the explicit load trigger; the viewer calls `on_load` once the
/// document is displayed. `recycle` releases the viewer's resources and is
/// called exactly once by [`DocumentView`].
#[async_trait]
pub trait DocumentViewer: Send {
    async fn load(
        &mut self,
        document: &CachedDocument,
        options: ViewerOptions,
        on_load: OnLoad,
    ) -> Result<(), ViewerError>;

    fn recycle(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Loaded,
    /// No document could be fetched, or the viewer rejected it
    Failed,
}

/// One document view: fetches a document through the cache and hands the
/// local file to its viewer.
pub struct DocumentView<V: DocumentViewer> {
    viewer: V,
    options: ViewerOptions,
    state: Arc<watch::Sender<ViewState>>,
    recycled: bool,
}

impl<V: DocumentViewer> DocumentView<V> {
    pub fn new(viewer: V, options: ViewerOptions) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            viewer,
            options,
            state: Arc::new(state),
            recycled: false,
        }
    }

    pub fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    /// Observe state changes, e.g. to drive a loading indicator
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Fetch `source` and load it into the viewer.
    ///
    /// Returns the state right after the hand-off. A viewer that completes
    /// asynchronously leaves the view in `Loading` until it fires `on_load`;
    /// use [`DocumentView::settled`] to wait for that. Dropping the returned
    /// future abandons the fetch.
    pub async fn show(&mut self, cache: &DocumentCache, source: Option<&str>) -> ViewState {
        self.state.send_replace(ViewState::Loading);

        let Some(document) = cache.fetch(source).await else {
            self.state.send_replace(ViewState::Failed);
            return ViewState::Failed;
        };

        let state = Arc::clone(&self.state);
        let key = document.key.clone();
        let on_load: OnLoad = Box::new(move |info| {
            debug!(key = %key, size = info.size, "Document loaded");
            state.send_replace(ViewState::Loaded);
        });

        if let Err(e) = self.viewer.load(&document, self.options, on_load).await {
            warn!(key = %document.key, error = %e, "Viewer failed to load document");
            self.state.send_replace(ViewState::Failed);
        }

        self.state()
    }

    /// Wait until the view leaves `Loading`
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|state| *state != ViewState::Loading)
            .await
            .map(|state| *state);
        settled.unwrap_or(ViewState::Failed)
    }

    /// Tear the view down, recycling the viewer
    pub fn dispose(mut self) {
        self.recycle_once();
    }

    fn recycle_once(&mut self) {
        if !self.recycled {
            self.recycled = true;
            self.viewer.recycle();
        }
    }
}

impl<V: DocumentViewer> Drop for DocumentView<V> {
    fn drop(&mut self) {
        self.recycle_once();
    }
}
