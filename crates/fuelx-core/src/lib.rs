//! Core library for fuel invoice extraction.
//!
//! This crate provides:
//! - PDF text extraction (lopdf + pdf-extract)
//! - Provider detection for IP, Esso, Q8 and Tamoil invoices
//! - Layout-specific parsers and record normalization
//! - Batch aggregation and CSV export

pub mod batch;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use batch::{
    BatchResult, BatchSummary, CsvExporter, ExtractedInvoice, ExtractionOutcome, FailureReport,
    InputFile, PartialReport, Pipeline, suggested_filename, to_csv,
};
pub use error::{FailureKind, FileError, FuelxError, PdfError, Result, ValidationError};
pub use invoice::{Normalizer, ParsedInvoice, ProviderParser, RawFields, detect, parser_for};
pub use models::config::{BatchConfig, ExportConfig, FuelxConfig, ValidationConfig};
pub use models::record::{
    FuelRecord, InvoiceHeader, ProviderInfo, ProviderKind, supported_providers,
};
pub use pdf::{PdfExtractor, PdfProcessor, RawDocument, RawPage, extract_text};
