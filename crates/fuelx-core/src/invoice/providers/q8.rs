//! CartissimaQ8 invoices issued by Kuwait Petroleum Italia.
//!
//! Pages 1 and 2 hold the invoice summary; line items start on page 3 and
//! each card block ends with a `TARGA/NOME <plate>` trailer.

use tracing::debug;

use super::{capture_amount, capture_date, capture_string};
use crate::invoice::rows::RowCollector;
use crate::invoice::rules::find_amounts;
use crate::invoice::rules::patterns::{
    Q8_DATE, Q8_LOCATION, Q8_NUMBER, Q8_PLATE, Q8_ROW, Q8_ROW_ANCHOR, Q8_STATION, Q8_TOTALS,
};
use crate::invoice::{ParsedInvoice, ProviderParser, RawFields, Result};
use crate::models::record::{InvoiceHeader, ProviderKind};
use crate::pdf::RawDocument;

/// First page carrying line items.
const FIRST_DETAIL_PAGE: u32 = 3;

/// Parser for CartissimaQ8 invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct Q8Parser;

/// Product name for a Q8 product code; unknown codes pass through.
pub fn product_name(code: &str) -> &str {
    match code {
        "GLS" => "GASOLIO",
        "SSP" => "BENZINA",
        "GPL" => "GPL",
        "HGL" => "GASOLIO PREMIUM",
        "GEC" => "GASOLIO ECOPLUS",
        "BWR" => "BENZINA 100",
        "HBZ" => "BENZINA PREMIUM",
        other => other,
    }
}

impl Q8Parser {
    fn header(&self, text: &str) -> InvoiceHeader {
        InvoiceHeader {
            invoice_number: capture_string(&Q8_NUMBER, text),
            invoice_date: capture_date(&Q8_DATE, text),
            customer: None,
            total_net: capture_amount(&Q8_TOTALS, text, 1),
            total_vat: capture_amount(&Q8_TOTALS, text, 2),
            total_gross: capture_amount(&Q8_TOTALS, text, 3),
        }
    }

    fn row(&self, line: &str) -> Option<RawFields> {
        let caps = Q8_ROW.captures(line)?;
        let rest = &line[caps.get(0)?.end()..];

        // Amount, volume and unit price, in print order
        let numbers = find_amounts(rest);
        let [amount, volume, price, ..] = numbers.as_slice() else {
            return None;
        };

        let station = Q8_STATION.captures(line)?.name("station")?;
        let location = Q8_LOCATION
            .captures(&line[station.end()..])
            .map(|c| c["location"].trim().to_string())
            .unwrap_or_default();

        let time = &caps["time"];
        Some(RawFields {
            plate: None,
            date: caps["date"].to_string(),
            time: Some(format!("{}:{}", &time[..2], &time[2..])),
            receipt_number: caps["ticket"].to_string(),
            station_code: station.as_str().to_string(),
            location,
            odometer: None,
            product: product_name(&caps["product"]).to_string(),
            quantity: volume.to_string(),
            unit_price: Some(price.to_string()),
            total_amount: amount.to_string(),
            card_number: Some(caps["pan"].to_string()),
        })
    }
}

impl ProviderParser for Q8Parser {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Q8
    }

    fn parse(&self, document: &RawDocument) -> Result<ParsedInvoice> {
        let header = self.header(document.text());
        let mut rows = RowCollector::new(ProviderKind::Q8);

        for line in document.lines_from_page(FIRST_DETAIL_PAGE) {
            if let Some(caps) = Q8_PLATE.captures(line) {
                rows.assign_plate(&caps[1], None);
                continue;
            }

            if let Some(row) = self.row(line) {
                rows.push_pending(row);
            } else if Q8_ROW_ANCHOR.is_match(line) {
                rows.reject(line);
            }
        }

        let parsed = rows.finish(header)?;
        debug!(
            "Q8 invoice {:?}: {} rows, {} rejected",
            parsed.header.invoice_number,
            parsed.rows.len(),
            parsed.rejected_rows
        );
        Ok(parsed)
    }
}
