//! PDF text extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, RawDocument, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf for structure and pdf-extract for text.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Extract the loaded PDF into a [`RawDocument`].
    pub fn extract_document(&self) -> Result<RawDocument> {
        let pages = self.extract_pages()?;
        let document = RawDocument::from_pages(&pages);

        if document.is_empty() {
            return Err(PdfError::NoText);
        }

        debug!(
            "Extracted {} pages, {} chars of text",
            document.page_count(),
            document.text().len()
        );
        Ok(document)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract works on bytes, so hand it the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // pdf-extract panics on some malformed content streams
        let data = &self.raw_data;
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }))
        .map_err(|_| PdfError::TextExtraction("text extractor aborted on malformed content".to_string()))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Convert raw PDF bytes into ordered text lines.
///
/// Fails on unparseable, encrypted, page-less or text-less input; never
/// returns a partial document.
pub fn extract_text(bytes: &[u8]) -> Result<RawDocument> {
    let mut extractor = PdfExtractor::new();
    extractor.load(bytes)?;
    extractor.extract_document()
}
