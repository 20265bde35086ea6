//! Covenant Text Sources
//!
//! Turns agreement files into plain text for the section extractors.
//!
//! # Sources
//!
//! - `PdfTextSource`: page-delimited text from PDFs, optionally capped at N pages
//! - `PlainTextSource`: `.txt` files read as-is
//! - `DocumentSource`: picks one of the above by file extension
//!
//! Each PDF page is preceded by a `=== [PAGE n] ===` marker line surrounded by
//! blank lines.

#![warn(missing_docs)]

pub mod error;
pub mod pdf;

pub use error::{Result, SourceError};
pub use pdf::PdfTextSource;

use covenant_domain::TextSource;
use std::path::Path;

/// Marker line written before page `n`
pub fn page_marker(page: usize) -> String {
    format!("=== [PAGE {}] ===", page)
}

/// Join numbered pages into one marked-up text, trimmed at both ends
///
/// # Examples
///
/// ```
/// use covenant_source::assemble_pages;
///
/// let text = assemble_pages(vec![(1, "Alpha".to_string()), (2, "Beta".to_string())]);
/// assert_eq!(text, "=== [PAGE 1] ===\n\nAlpha\n\n=== [PAGE 2] ===\n\nBeta");
/// ```
pub fn assemble_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = (usize, String)>,
{
    let mut out = String::new();
    for (page, text) in pages {
        out.push_str("\n\n");
        out.push_str(&page_marker(page));
        out.push_str("\n\n");
        out.push_str(&text);
    }
    out.trim().to_string()
}

/// Text source for plain-text files
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    type Error = SourceError;

    fn read_text(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        Ok(std::fs::read_to_string(path)?.trim().to_string())
    }
}

/// Dispatches `.txt` files to [`PlainTextSource`] and everything else to [`PdfTextSource`]
#[derive(Debug, Clone, Default)]
pub struct DocumentSource {
    pdf: PdfTextSource,
    plain: PlainTextSource,
}

impl DocumentSource {
    /// Source with an optional PDF page limit
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            pdf: PdfTextSource::new().with_max_pages(max_pages),
            plain: PlainTextSource,
        }
    }

    /// Whether `path` is read as plain text
    pub fn is_plain_text(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    }
}

impl TextSource for DocumentSource {
    type Error = SourceError;

    fn read_text(&self, path: &Path) -> Result<String> {
        if Self::is_plain_text(path) {
            self.plain.read_text(path)
        } else {
            self.pdf.read_text(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble_pages(Vec::new()), "");
    }

    #[test]
    fn test_assemble_keeps_blank_pages_marked() {
        let text = assemble_pages(vec![(1, String::new()), (2, "Body".to_string())]);
        assert!(text.starts_with("=== [PAGE 1] ==="));
        assert!(text.contains("=== [PAGE 2] ===\n\nBody"));
    }

    #[test]
    fn test_plain_text_source() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "\n  Section 4.1 Restricted Payments\n").unwrap();

        let text = PlainTextSource.read_text(file.path()).unwrap();
        assert_eq!(text, "Section 4.1 Restricted Payments");
    }

    #[test]
    fn test_plain_text_missing() {
        let result = PlainTextSource.read_text(Path::new("/nonexistent/a.txt"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_document_source_dispatch() {
        assert!(DocumentSource::is_plain_text(Path::new("deal.TXT")));
        assert!(!DocumentSource::is_plain_text(Path::new("deal.pdf")));
        assert!(!DocumentSource::is_plain_text(Path::new("deal")));

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Liens").unwrap();
        let text = DocumentSource::new(Some(1)).read_text(file.path()).unwrap();
        assert_eq!(text, "Liens");
    }
}
