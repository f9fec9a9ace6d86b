//! CSV export of batch records.

use std::fmt::Write as _;
use std::io::Write;

use chrono::NaiveDateTime;
use tracing::debug;

use super::BatchResult;
use crate::error::{FuelxError, Result};
use crate::invoice::rules::format_amount;
use crate::models::config::ExportConfig;
use crate::models::record::FuelRecord;

/// Column names, in canonical field order.
pub const CSV_HEADER: [&str; 14] = [
    "Targa",
    "Data_Rifornimento",
    "Litri",
    "Prezzo_Unitario",
    "Importo_Totale",
    "Fornitore",
    "File_Origine",
    "Ora_Rifornimento",
    "Chilometraggio",
    "Prodotto",
    "Numero_Scontrino",
    "Codice_Sede",
    "Localita",
    "Numero_Carta",
];

/// Writes batch records as delimited text.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: ExportConfig,
}

impl CsvExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Write the header and every record of the batch.
    pub fn write<W: Write>(&self, result: &BatchResult, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter_byte()?)
            .from_writer(out);

        writer.write_record(CSV_HEADER)?;
        let mut count = 0;
        for record in result.records() {
            writer.write_record(self.row(record)?)?;
            count += 1;
        }
        writer.flush()?;

        debug!("Wrote {} CSV rows", count);
        Ok(())
    }

    /// Export to an in-memory buffer.
    pub fn export(&self, result: &BatchResult) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(result, &mut buffer)?;
        Ok(buffer)
    }

    fn row(&self, record: &FuelRecord) -> Result<[String; 14]> {
        let sep = self.config.decimal_separator;

        let mut date = String::new();
        write!(date, "{}", record.refuel_date().format(&self.config.date_format)).map_err(|_| {
            FuelxError::Config(format!("invalid date format {:?}", self.config.date_format))
        })?;

        Ok([
            record.plate().to_string(),
            date,
            format_amount(record.quantity(), 2, sep),
            record
                .unit_price()
                .map(|p| format_amount(p, 3, sep))
                .unwrap_or_default(),
            format_amount(record.total_amount(), 2, sep),
            record.provider().code().to_string(),
            record.source_file().to_string(),
            record
                .refuel_time()
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            record
                .odometer_km()
                .map(|km| km.to_string())
                .unwrap_or_default(),
            record.product().to_string(),
            record.receipt_number().to_string(),
            record.station_code().to_string(),
            record.location().to_string(),
            record.card_number().unwrap_or_default().to_string(),
        ])
    }
}

/// Serialize the batch records to CSV bytes.
///
/// The same batch always yields the same bytes.
pub fn to_csv(result: &BatchResult, config: &ExportConfig) -> Result<Vec<u8>> {
    CsvExporter::new(config.clone()).export(result)
}

/// Default export file name for a run started at `now`.
pub fn suggested_filename(now: NaiveDateTime) -> String {
    format!("rifornimenti_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
