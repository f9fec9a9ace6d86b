//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::{BatchConfig, ExportConfig, FuelxConfig, ValidationConfig};
pub use record::{FuelRecord, InvoiceHeader, ProviderInfo, ProviderKind, supported_providers};
