//! Configuration structures for the extraction pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FuelxError, Result};

/// Upper bound for `validation.max_future_days` (about ten years).
pub const MAX_FUTURE_DAYS: u32 = 3660;

/// Main configuration for the fuelx pipeline.
///
/// Loaded once by the caller and handed to [`crate::batch::Pipeline::new`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelxConfig {
    /// Batch limits and parallelism.
    pub batch: BatchConfig,

    /// Record validation thresholds.
    pub validation: ValidationConfig,

    /// CSV export format.
    pub export: ExportConfig,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of files accepted in one batch (enforced by the caller).
    pub max_files: usize,

    /// Maximum size of a single file in bytes (enforced by the caller).
    pub max_file_size_bytes: u64,

    /// Number of parallel workers (1 = sequential).
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size_bytes: 50 * 1024 * 1024,
            jobs: 4,
        }
    }
}

/// Record validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed difference between quantity x unit price and total, in EUR.
    pub amount_tolerance: Decimal,

    /// Earliest plausible refueling date.
    pub min_date: NaiveDate,

    /// How many days past today a refueling date may lie.
    pub max_future_days: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(1, 2),
            min_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            max_future_days: 31,
        }
    }
}

/// CSV export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter (single ASCII character).
    pub delimiter: char,

    /// Decimal separator for numeric columns.
    pub decimal_separator: char,

    /// chrono format string for date columns.
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl ExportConfig {
    /// Delimiter as the byte the CSV writer expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() && !self.delimiter.is_ascii_alphanumeric() {
            Ok(self.delimiter as u8)
        } else {
            Err(FuelxError::Config(format!(
                "CSV delimiter must be an ASCII punctuation or whitespace character, got {:?}",
                self.delimiter
            )))
        }
    }
}

impl FuelxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| FuelxError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FuelxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde alone cannot reject.
    pub fn validate(&self) -> Result<()> {
        self.export.delimiter_byte()?;
        if self.export.delimiter == self.export.decimal_separator {
            return Err(FuelxError::Config(
                "CSV delimiter and decimal separator must differ".to_string(),
            ));
        }
        if self.batch.jobs == 0 {
            return Err(FuelxError::Config("batch.jobs must be at least 1".to_string()));
        }
        if self.validation.max_future_days > MAX_FUTURE_DAYS {
            return Err(FuelxError::Config(format!(
                "validation.max_future_days must be at most {}",
                MAX_FUTURE_DAYS
            )));
        }
        if self.validation.amount_tolerance.is_sign_negative() {
            return Err(FuelxError::Config(
                "validation.amount_tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
