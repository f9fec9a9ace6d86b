//! PDF processing module.

mod extractor;

pub use extractor::{PdfExtractor, extract_text};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text of every page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;
}

/// Text content of one PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Non-empty lines with whitespace runs collapsed.
    pub lines: Vec<String>,
}

/// Ordered text lines of one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pages: Vec<RawPage>,
    text: String,
}

impl RawDocument {
    /// Build a document from per-page text.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages: Vec<RawPage> = pages
            .into_iter()
            .enumerate()
            .map(|(idx, page)| RawPage {
                number: idx as u32 + 1,
                lines: normalize_lines(page.as_ref()),
            })
            .collect();

        let text = pages
            .iter()
            .flat_map(|p| p.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n");

        Self { pages, text }
    }

    /// Build a single-page document.
    pub fn from_text(text: &str) -> Self {
        Self::from_pages([text])
    }

    pub fn pages(&self) -> &[RawPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All lines joined with `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every line of every page, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(String::as_str))
    }

    /// Lines of pages numbered `first_page` and later.
    pub fn lines_from_page(&self, first_page: u32) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .filter(move |p| p.number >= first_page)
            .flat_map(|p| p.lines.iter().map(String::as_str))
    }

    /// True when no page carries any text.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.lines.is_empty())
    }
}

fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}
