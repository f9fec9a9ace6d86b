//! Provider detection, invoice parsing and record normalization.

pub mod detector;
mod normalizer;
mod providers;
mod rows;
pub mod rules;

pub use detector::detect;
pub use normalizer::Normalizer;
pub use providers::{EssoParser, IpParser, Q8Parser, TamoilParser, parser_for};

use crate::error::FileError;
use crate::models::record::{InvoiceHeader, ProviderKind};
use crate::pdf::RawDocument;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, FileError>;

/// Extraction contract shared by every provider layout.
pub trait ProviderParser: Send + Sync {
    /// Provider this parser understands.
    fn kind(&self) -> ProviderKind;

    /// Pull the invoice header and the raw line items out of a document.
    ///
    /// Fails with [`FileError::ExtractionFailed`] when the document does not
    /// follow the provider's layout. A document with no line items at all
    /// yields an empty row list.
    fn parse(&self, document: &RawDocument) -> Result<ParsedInvoice>;
}

/// Raw strings for one line item, as printed on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub plate: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub receipt_number: String,
    pub station_code: String,
    pub location: String,
    pub odometer: Option<String>,
    pub product: String,
    pub quantity: String,
    pub unit_price: Option<String>,
    pub total_amount: String,
    pub card_number: Option<String>,
}

impl RawFields {
    /// Key used to drop rows repeated across page breaks.
    pub(crate) fn dedup_key(&self) -> (String, Option<String>, String) {
        (
            self.date.clone(),
            self.time.clone(),
            self.receipt_number.clone(),
        )
    }
}

/// Parser output: header data plus rows in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInvoice {
    pub header: InvoiceHeader,
    pub rows: Vec<RawFields>,
    /// Row-like lines that did not match the layout.
    pub rejected_rows: usize,
}
