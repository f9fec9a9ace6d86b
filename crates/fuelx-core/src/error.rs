//! Error types for the fuelx-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::record::ProviderKind;

/// Main error type for the fuelx library.
///
/// Per-file problems never surface here: they are captured as [`FileError`]
/// inside the batch outcome. This type covers faults that concern the whole
/// run.
#[derive(Error, Debug)]
pub enum FuelxError {
    /// Batch outcome collection failed.
    #[error("batch error: {0}")]
    Batch(String),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF parsed but carries no text layer.
    #[error("PDF contains no extractable text")]
    NoText,
}

/// A field was located but its value is not acceptable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed for {field}: {reason}")]
pub struct ValidationError {
    /// Canonical field name (e.g. `refuel_date`).
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why a single input file produced no records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    /// Bytes are not a readable PDF or have no text.
    #[error("unreadable PDF: {0}")]
    UnreadablePdf(#[from] PdfError),

    /// No provider signature found in the document.
    #[error("unsupported provider: no known invoice signature found")]
    UnsupportedProvider,

    /// Document matched a provider but its layout could not be followed.
    #[error("{provider} extraction failed: {reason}")]
    ExtractionFailed {
        provider: ProviderKind,
        reason: String,
    },

    /// A located field is semantically invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FileError {
    pub fn extraction(provider: ProviderKind, reason: impl Into<String>) -> Self {
        FileError::ExtractionFailed {
            provider,
            reason: reason.into(),
        }
    }

    /// Failure category, for summaries and reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            FileError::UnreadablePdf(_) => FailureKind::UnreadablePdf,
            FileError::UnsupportedProvider => FailureKind::UnsupportedProvider,
            FileError::ExtractionFailed { .. } => FailureKind::ExtractionFailed,
            FileError::Validation(_) => FailureKind::ValidationError,
        }
    }
}

/// Flat failure taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    UnreadablePdf,
    UnsupportedProvider,
    ExtractionFailed,
    ValidationError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::UnreadablePdf => "UnreadablePdf",
            FailureKind::UnsupportedProvider => "UnsupportedProvider",
            FailureKind::ExtractionFailed => "ExtractionFailed",
            FailureKind::ValidationError => "ValidationError",
        };
        f.write_str(name)
    }
}

/// Result type for the fuelx library.
pub type Result<T> = std::result::Result<T, FuelxError>;
