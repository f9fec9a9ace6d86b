//! IP Plus invoices.
//!
//! Line items are listed per vehicle and closed by a `TARGA <plate>` line.

use tracing::debug;

use super::{capture_amount, capture_date, capture_string};
use crate::invoice::rows::RowCollector;
use crate::invoice::rules::last_amount;
use crate::invoice::rules::patterns::{
    IP_DATE, IP_NET, IP_NUMBER, IP_PLATE, IP_ROW, IP_ROW_ANCHOR, IP_TOTAL, IP_VAT,
};
use crate::invoice::{ParsedInvoice, ProviderParser, RawFields, Result};
use crate::models::record::{InvoiceHeader, ProviderKind};
use crate::pdf::RawDocument;

/// Parser for IP Plus S.r.l. fuel card invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpParser;

impl IpParser {
    fn header(&self, text: &str) -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: capture_string(&IP_NUMBER, text),
            invoice_date: capture_date(&IP_DATE, text),
            customer: None,
            total_net: capture_amount(&IP_NET, text, 1),
            total_vat: capture_amount(&IP_VAT, text, 1),
            total_gross: capture_amount(&IP_TOTAL, text, 1),
        }
    }

    fn row(&self, line: &str) -> Option<RawFields> {
        let caps = IP_ROW.captures(line)?;
        let liters = caps.name("liters")?;
        // The row total is the last amount printed after the liters
        let total = last_amount(&line[liters.end()..])?;

        Some(RawFields {
            plate: None,
            date: caps["date"].to_string(),
            time: Some(caps["time"].to_string()),
            receipt_number: caps["receipt"].to_string(),
            station_code: caps["station"].to_string(),
            location: caps["location"].trim().trim_end_matches(',').to_string(),
            odometer: Some(caps["km"].to_string()),
            product: caps["product"].to_string(),
            quantity: liters.as_str().to_string(),
            unit_price: None,
            total_amount: total.to_string(),
            card_number: None,
        })
    }
}

impl ProviderParser for IpParser {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ip
    }

    fn parse(&self, document: &RawDocument) -> Result<ParsedInvoice> {
        let header = self.header(document.text());
        let mut rows = RowCollector::new(ProviderKind::Ip);

        for line in document.lines() {
            if let Some(caps) = IP_PLATE.captures(line) {
                rows.assign_plate(&caps[1], None);
                continue;
            }

            if let Some(row) = self.row(line) {
                rows.push_pending(row);
            } else if IP_ROW_ANCHOR.is_match(line) {
                rows.reject(line);
            }
        }

        let parsed = rows.finish(header)?;
        debug!(
            "IP invoice {:?}: {} rows, {} rejected",
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
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const INVOICE: &str = "\
IP PLUS S.R.L.
Fattura Nr: 2500123 Data: 15/10/2025
Data Ora Scontrino PV Localita Km Prodotto Litri Prezzo Importo
01/10/25 08:15 12345678 00123 ROMA VIA SALARIA 123.456 0000 GASOLIO SELF 45,20 1,789 80,86
03/10/25 17:40 12345690 00456 RIETI, 123.980 0000 GASOLIO 30,00 1,850 55,50
TARGA AB123CD
05/10/25 09:05 12345702 00123 ROMA VIA SALARIA 1 0000 GASOLIO SELF 20,00 1,789 35,78
TARGA EF456GH
Acquisti del periodo: EUR 140,31
IVA EUR 30,87
Totale Importo: EUR 171,18";

    #[test]
    fn test_parse_rows_and_plates() {
        let doc = RawDocument::from_text(INVOICE);
        let parsed = IpParser.parse(&doc).unwrap();

        assert_eq!(parsed.rows.len(), 3);
        let first = &parsed.rows[0];
        assert_eq!(first.plate.as_deref(), Some("AB123CD"));
        assert_eq!(first.date, "01/10/25");
        assert_eq!(first.time.as_deref(), Some("08:15"));
        assert_eq!(first.receipt_number, "12345678");
        assert_eq!(first.station_code, "00123");
        assert_eq!(first.location, "ROMA VIA SALARIA");
        assert_eq!(first.odometer.as_deref(), Some("123.456"));
        assert_eq!(first.product, "GASOLIO SELF");
        assert_eq!(first.quantity, "45,20");
        assert_eq!(first.total_amount, "80,86");
        assert_eq!(first.unit_price, None);

        assert_eq!(parsed.rows[1].location, "RIETI");
        assert_eq!(parsed.rows[1].product, "GASOLIO");
        assert_eq!(parsed.rows[2].plate.as_deref(), Some("EF456GH"));
        assert_eq!(parsed.rows[2].odometer.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_header() {
        let doc = RawDocument::from_text(INVOICE);
        let header = IpParser.parse(&doc).unwrap().header;
        assert_eq!(header.invoice_number.as_deref(), Some("2500123"));
        assert_eq!(header.invoice_date, NaiveDate::from_ymd_opt(2025, 10, 15));
        assert_eq!(header.total_net, Some(Decimal::from_str("140.31").unwrap()));
        assert_eq!(header.total_vat, Some(Decimal::from_str("30.87").unwrap()));
        assert_eq!(header.total_gross, Some(Decimal::from_str("171.18").unwrap()));
    }

    #[test]
    fn test_rows_without_plate_fail() {
        let doc = RawDocument::from_text(
            "IP PLUS S.R.L.\n01/10/25 08:15 12345678 00123 ROMA 1 0000 GASOLIO 45,20 80,86",
        );
        assert!(IpParser.parse(&doc).is_err());
    }

    #[test]
    fn test_only_malformed_rows_fail() {
        let doc = RawDocument::from_text(
            "IP PLUS S.R.L.\n01/10/25 08:15 scontrino illeggibile\nTARGA AB123CD",
        );
        let err = IpParser.parse(&doc).unwrap_err();
        assert!(err.to_string().contains("did not match"));
    }

    #[test]
    fn test_no_rows_is_empty() {
        let doc = RawDocument::from_text("IP PLUS S.R.L.\nNota di credito Nr: 77");
        let parsed = IpParser.parse(&doc).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.header.invoice_number.as_deref(), Some("77"));
    }
}
