//! Row bookkeeping shared by the provider parsers.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{ParsedInvoice, RawFields, Result};
use crate::error::FileError;
use crate::models::record::{InvoiceHeader, ProviderKind};

/// Collects line items while a document is scanned.
///
/// Rows printed before their plate trailer wait in `pending` until
/// [`RowCollector::assign_plate`] is called. Rows repeated with the same
/// (date, time, receipt) key are kept once.
pub(crate) struct RowCollector {
    provider: ProviderKind,
    pending: Vec<RawFields>,
    rows: Vec<RawFields>,
    seen: HashSet<(String, Option<String>, String)>,
    rejected: usize,
    duplicates: usize,
}

impl RowCollector {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            pending: Vec::new(),
            rows: Vec::new(),
            seen: HashSet::new(),
            rejected: 0,
            duplicates: 0,
        }
    }

    /// Queue a row whose plate appears later in the document.
    pub fn push_pending(&mut self, row: RawFields) {
        if self.is_new(&row) {
            self.pending.push(row);
        }
    }

    /// Accept a row whose plate is already known.
    pub fn push(&mut self, row: RawFields) {
        if self.is_new(&row) {
            self.rows.push(row);
        }
    }

    /// Give every pending row a plate (and card number, when the row has
    /// none). Returns how many rows were assigned.
    pub fn assign_plate(&mut self, plate: &str, card_number: Option<&str>) -> usize {
        let count = self.pending.len();
        for mut row in self.pending.drain(..) {
            row.plate = Some(plate.to_string());
            if row.card_number.is_none() {
                row.card_number = card_number.map(str::to_string);
            }
            self.rows.push(row);
        }
        debug!("{}: plate {} assigned to {} rows", self.provider, plate, count);
        count
    }

    /// Record a line that looks like a row but does not follow the layout.
    pub fn reject(&mut self, line: &str) {
        self.rejected += 1;
        warn!("{}: skipping malformed row {:?}", self.provider, line);
    }

    /// Close the document and pair the rows with its header.
    ///
    /// Fails when rows never received a plate, or when every row-like line
    /// was rejected. Otherwise the rejected count travels with the rows.
    pub fn finish(self, header: InvoiceHeader) -> Result<ParsedInvoice> {
        if !self.pending.is_empty() {
            return Err(FileError::extraction(
                self.provider,
                format!("{} rows without a plate", self.pending.len()),
            ));
        }

        if self.rejected > 0 && self.rows.is_empty() {
            return Err(FileError::extraction(
                self.provider,
                format!(
                    "{} row-like lines did not match the expected layout",
                    self.rejected
                ),
            ));
        }

        debug!(
            "{}: {} rows accepted, {} rejected, {} duplicates dropped",
            self.provider,
            self.rows.len(),
            self.rejected,
            self.duplicates
        );
        Ok(ParsedInvoice {
            header,
            rows: self.rows,
            rejected_rows: self.rejected,
        })
    }

    fn is_new(&mut self, row: &RawFields) -> bool {
        if self.seen.insert(row.dedup_key()) {
            true
        } else {
            self.duplicates += 1;
            false
        }
    }
}
