//! Viewer that renders a cached document into an HTTP response body

use async_trait::async_trait;
use pdf_cache::{CachedDocument, DocumentViewer, LoadInfo, OnLoad, ViewerError, ViewerOptions};
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Holds the loaded document until the handler takes it
#[derive(Debug, Default)]
pub struct ResponseViewer {
    body: Option<Vec<u8>>,
    from_cache: bool,
}

impl ResponseViewer {
    /// Take the rendered body, leaving the viewer empty
    pub fn take_body(&mut self) -> Option<Vec<u8>> {
        self.body.take()
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }
}

#[async_trait]
impl DocumentViewer for ResponseViewer {
    async fn load(
        &mut self,
        document: &CachedDocument,
        options: ViewerOptions,
        on_load: OnLoad,
    ) -> Result<(), ViewerError> {
        let data = tokio::fs::read(&document.path).await?;
        if !data.starts_with(PDF_MAGIC) {
            return Err(ViewerError::Render(format!(
                "{} is not a PDF document",
                document.key
            )));
        }

        debug!(
            key = %document.key,
            scroll_handle = options.scroll_handle,
            antialiasing = options.antialiasing,
            "Rendering document"
        );

        let size = data.len() as u64;
        self.body = Some(data);
        self.from_cache = document.from_cache;
        on_load(LoadInfo { size });
        Ok(())
    }

    fn recycle(&mut self) {
        self.body = None;
    }
}
