//! Tamoil mycard invoices.

use tracing::debug;

use super::{capture_amount, capture_date, capture_string};
use crate::invoice::rows::RowCollector;
use crate::invoice::rules::patterns::{
    TAMOIL_CUSTOMER, TAMOIL_DATE, TAMOIL_NET, TAMOIL_NUMBER, TAMOIL_PLATE, TAMOIL_ROW,
    TAMOIL_ROW_ANCHOR, TAMOIL_TOTAL, TAMOIL_VAT,
};
use crate::invoice::{ParsedInvoice, ProviderParser, RawFields, Result};
use crate::models::record::{InvoiceHeader, ProviderKind};
use crate::pdf::RawDocument;

/// Parser for Tamoil Italia invoices.
///
/// Rows of one card are followed by `Totale Carta <pan> Targa <plate>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TamoilParser;

impl TamoilParser {
    fn header(&self, text: &str) -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: capture_string(&TAMOIL_NUMBER, text),
            invoice_date: capture_date(&TAMOIL_DATE, text),
            customer: capture_string(&TAMOIL_CUSTOMER, text),
            total_net: capture_amount(&TAMOIL_NET, text, 1),
            total_vat: capture_amount(&TAMOIL_VAT, text, 1),
            total_gross: capture_amount(&TAMOIL_TOTAL, text, 1),
        }
    }

    fn row(&self, line: &str) -> Option<RawFields> {
        let caps = TAMOIL_ROW.captures(line)?;
        Some(RawFields {
            plate: None,
            date: caps["date"].to_string(),
            time: Some(caps["time"].to_string()),
            receipt_number: caps["auth"].to_string(),
            station_code: caps["station"].to_string(),
            location: caps["location"].trim().to_string(),
            odometer: Some(caps["km"].to_string()),
            product: caps["product"].trim().to_string(),
            quantity: caps["quantity"].to_string(),
            unit_price: None,
            total_amount: caps["amount"].to_string(),
            card_number: None,
        })
    }
}

impl ProviderParser for TamoilParser {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Tamoil
    }

    fn parse(&self, document: &RawDocument) -> Result<ParsedInvoice> {
        let header = self.header(document.text());
        let mut rows = RowCollector::new(ProviderKind::Tamoil);

        for line in document.lines() {
            if let Some(caps) = TAMOIL_PLATE.captures(line) {
                let pan = caps.name("pan").map(|m| m.as_str());
                rows.assign_plate(&caps["plate"], pan);
                continue;
            }

            if let Some(row) = self.row(line) {
                rows.push_pending(row);
            } else if TAMOIL_ROW_ANCHOR.is_match(line) {
                rows.reject(line);
            }
        }

        let parsed = rows.finish(header)?;
        debug!(
            "Tamoil invoice {:?}: {} rows, {} rejected",
            parsed.header.invoice_number,
            parsed.rows.len(),
            parsed.rejected_rows
        );
        Ok(parsed)
    }
}
