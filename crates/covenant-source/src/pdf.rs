//! PDF text source
//!
//! Reads pages with `lopdf` and falls back to `pdf-extract` when the primary
//! backend cannot load the file or produces no text.

use crate::assemble_pages;
use crate::error::{Result, SourceError};
use covenant_domain::TextSource;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Page separator emitted by `pdf-extract`
const FORM_FEED: char = '\u{000C}';

/// Text source for PDF files
#[derive(Debug, Clone, Default)]
pub struct PdfTextSource {
    max_pages: Option<usize>,
}

impl PdfTextSource {
    /// Source reading every page
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read the first `max_pages` pages (`None` reads all)
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Page limit in effect
    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    fn page_limit(&self) -> usize {
        self.max_pages.unwrap_or(usize::MAX)
    }

    fn extract_with_lopdf(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path).map_err(|e| SourceError::Load(e.to_string()))?;

        let pages = doc
            .get_pages()
            .into_keys()
            .take(self.page_limit())
            .map(|page_num| {
                let text = doc.extract_text(&[page_num]).unwrap_or_else(|e| {
                    warn!(page = page_num, error = %e, "skipping unreadable page");
                    String::new()
                });
                (page_num as usize, text)
            });

        Ok(assemble_pages(pages))
    }

    fn extract_with_pdf_extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        // pdf-extract can panic on malformed PDFs
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }));
        let text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Err(SourceError::Extraction(format!("pdf-extract failed: {}", e)));
            }
            Err(_) => {
                return Err(SourceError::Extraction(
                    "pdf-extract panicked (malformed PDF)".to_string(),
                ));
            }
        };
        Ok(assemble_pages(split_pages(&text, self.page_limit())))
    }
}

/// Split `pdf-extract` output on form feeds into numbered pages
fn split_pages(text: &str, limit: usize) -> impl Iterator<Item = (usize, String)> + '_ {
    text.split(FORM_FEED)
        .take(limit)
        .enumerate()
        .map(|(i, page)| (i + 1, page.to_string()))
}

impl TextSource for PdfTextSource {
    type Error = SourceError;

    fn read_text(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let primary = match self.extract_with_lopdf(path) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(path = %path.display(), chars = text.len(), "extracted with lopdf");
                return Ok(text);
            }
            Ok(text) => {
                warn!(path = %path.display(), "lopdf produced no text, trying pdf-extract");
                Ok(text)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "lopdf failed, trying pdf-extract");
                Err(e)
            }
        };

        match (primary, self.extract_with_pdf_extract(path)) {
            (_, Ok(text)) if !text.trim().is_empty() => {
                debug!(path = %path.display(), chars = text.len(), "extracted with pdf-extract");
                Ok(text)
            }
            // Scanned documents legitimately carry no text layer
            (Ok(empty), _) => Ok(empty),
            (Err(_), Ok(empty)) => Ok(empty),
            (Err(primary), Err(fallback)) => Err(SourceError::Extraction(format!(
                "all backends failed ({}; {})",
                primary, fallback
            ))),
        }
    }
}
