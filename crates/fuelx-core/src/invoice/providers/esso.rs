//! Esso Card invoices issued by WEX Europe Services.
//!
//! Each card section opens with `Carta: <nnn> <plate> <pan>`; the rows
//! below it belong to that vehicle. Rows carry no time of day.

use tracing::debug;

use super::{capture_amount, capture_date, capture_string};
use crate::error::FileError;
use crate::invoice::rows::RowCollector;
use crate::invoice::rules::last_amount;
use crate::invoice::rules::patterns::{
    ESSO_CARD, ESSO_CUSTOMER, ESSO_DATE, ESSO_NUMBER, ESSO_ROW, ESSO_ROW_ANCHOR, ESSO_TOTALS,
};
use crate::invoice::{ParsedInvoice, ProviderParser, RawFields, Result};
use crate::models::record::{InvoiceHeader, ProviderKind};
use crate::pdf::RawDocument;

/// Parser for Esso Card invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EssoParser;

struct Card {
    plate: String,
    pan: Option<String>,
}

impl EssoParser {
    fn header(&self, text: &str) -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: capture_string(&ESSO_NUMBER, text),
            invoice_date: capture_date(&ESSO_DATE, text),
            customer: capture_string(&ESSO_CUSTOMER, text),
            total_net: capture_amount(&ESSO_TOTALS, text, 1),
            total_vat: capture_amount(&ESSO_TOTALS, text, 2),
            total_gross: capture_amount(&ESSO_TOTALS, text, 3),
        }
    }

    fn row(&self, line: &str, card: &Card) -> Option<RawFields> {
        let caps = ESSO_ROW.captures(line)?;
        let quantity = caps.name("quantity")?;
        // Last amount on the row is the VAT-inclusive total
        let total = last_amount(&line[quantity.end()..])?;

        Some(RawFields {
            plate: Some(card.plate.clone()),
            date: caps["date"].to_string(),
            time: None,
            receipt_number: caps["ticket"].to_string(),
            station_code: caps["station"].to_string(),
            location: caps["location"].trim().to_string(),
            odometer: caps.name("km").map(|m| m.as_str().to_string()),
            product: "GASOLIO".to_string(),
            quantity: quantity.as_str().to_string(),
            unit_price: None,
            total_amount: total.to_string(),
            card_number: card.pan.clone(),
        })
    }
}

impl ProviderParser for EssoParser {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Esso
    }

    fn parse(&self, document: &RawDocument) -> Result<ParsedInvoice> {
        let header = self.header(document.text());
        let mut rows = RowCollector::new(ProviderKind::Esso);
        let mut card: Option<Card> = None;

        for line in document.lines() {
            if let Some(caps) = ESSO_CARD.captures(line) {
                card = Some(Card {
                    plate: caps["plate"].to_string(),
                    pan: caps.name("pan").map(|m| m.as_str().to_string()),
                });
                continue;
            }

            let row_like = ESSO_ROW.is_match(line) || ESSO_ROW_ANCHOR.is_match(line);
            if !row_like {
                continue;
            }

            let Some(current) = card.as_ref() else {
                return Err(FileError::extraction(
                    ProviderKind::Esso,
                    "transaction row found before any card header",
                ));
            };

            match self.row(line, current) {
                Some(row) => rows.push(row),
                None => rows.reject(line),
            }
        }

        let parsed = rows.finish(header)?;
        debug!(
            "Esso invoice {:?}: {} rows, {} rejected",
            parsed.header.invoice_number,
            parsed.rows.len(),
            parsed.rejected_rows
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const INVOICE: &str = "\
WEX Europe Services S.r.l. - ESSO CARD
Fattura No : 00573119 Data : 15.10.2025
Cliente : BEEBUS SPA
Carta: 078 FH682DD 7033166200912540788
07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50 1,599 42,50
08.10.25 000413 367031 RIETI 125000 gasolio autotrazione 40,00 64,00 1,600 64,00
Carta: 079 GA111BB
09.10.25 000500 367040 L'AQUILA gasolio autotrazion 10,00 16,00 1,600 16,00
TOTALE: 100,33 22,07 122,40";

    #[test]
    fn test_parse_rows_by_card() {
        let doc = RawDocument::from_text(INVOICE);
        let parsed = EssoParser.parse(&doc).unwrap();

        assert_eq!(parsed.rows.len(), 3);
        let first = &parsed.rows[0];
        assert_eq!(first.plate.as_deref(), Some("FH682DD"));
        assert_eq!(first.card_number.as_deref(), Some("7033166200912540788"));
        assert_eq!(first.date, "07.10.25");
        assert_eq!(first.time, None);
        assert_eq!(first.receipt_number, "000412");
        assert_eq!(first.station_code, "367030");
        assert_eq!(first.location, "CITTADUCALE");
        assert_eq!(first.odometer, None);
        assert_eq!(first.quantity, "26,58");
        assert_eq!(first.total_amount, "42,50");

        assert_eq!(parsed.rows[1].odometer.as_deref(), Some("125000"));
        assert_eq!(parsed.rows[1].location, "RIETI");
        assert_eq!(parsed.rows[2].plate.as_deref(), Some("GA111BB"));
        assert_eq!(parsed.rows[2].card_number, None);
        assert_eq!(parsed.rows[2].location, "L'AQUILA");
    }

    #[test]
    fn test_parse_header() {
        let doc = RawDocument::from_text(INVOICE);
        let header = EssoParser.parse(&doc).unwrap().header;
        assert_eq!(header.invoice_number.as_deref(), Some("00573119"));
        assert_eq!(header.customer.as_deref(), Some("BEEBUS SPA"));
        assert_eq!(header.total_gross, Some(Decimal::new(12240, 2)));
    }

    #[test]
    fn test_row_before_card_fails() {
        let doc = RawDocument::from_text(
            "ESSO CARD\n07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50",
        );
        let err = EssoParser.parse(&doc).unwrap_err();
        assert!(err.to_string().contains("before any card header"));
    }

    #[test]
    fn test_page_break_repeat_kept_once() {
        let text = "\
Carta: 078 FH682DD 7033166200912540788
07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50 1,599 42,50
Carta: 078 FH682DD 7033166200912540788
07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50 1,599 42,50";
        let doc = RawDocument::from_pages(["ESSO CARD", text]);
        assert_eq!(EssoParser.parse(&doc).unwrap().rows.len(), 1);
    }
}
