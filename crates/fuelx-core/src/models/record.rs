//! Canonical fuel purchase records and provider identities.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fuel provider whose invoice layout is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// IP Plus S.r.l.
    #[serde(rename = "IP")]
    Ip,
    /// Esso Card, invoiced by WEX Europe Services.
    #[serde(rename = "ESSO")]
    Esso,
    /// CartissimaQ8, invoiced by Kuwait Petroleum Italia.
    #[serde(rename = "Q8")]
    Q8,
    /// Tamoil mycard.
    #[serde(rename = "TAMOIL")]
    Tamoil,
    /// No known signature found.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl ProviderKind {
    /// Providers the detector recognizes, in tie-break priority order.
    pub const SUPPORTED: [ProviderKind; 4] = [
        ProviderKind::Ip,
        ProviderKind::Esso,
        ProviderKind::Q8,
        ProviderKind::Tamoil,
    ];

    /// Short code used in exports.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderKind::Ip => "IP",
            ProviderKind::Esso => "ESSO",
            ProviderKind::Q8 => "Q8",
            ProviderKind::Tamoil => "TAMOIL",
            ProviderKind::Unknown => "UNKNOWN",
        }
    }

    /// Parse a provider code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "IP" => Some(ProviderKind::Ip),
            "ESSO" => Some(ProviderKind::Esso),
            "Q8" => Some(ProviderKind::Q8),
            "TAMOIL" => Some(ProviderKind::Tamoil),
            "UNKNOWN" => Some(ProviderKind::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Static description of a supported provider.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderInfo {
    pub kind: ProviderKind,
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub identification: &'static str,
}

static PROVIDERS: [ProviderInfo; 4] = [
    ProviderInfo {
        kind: ProviderKind::Ip,
        code: "IP",
        name: "IP Plus",
        description: "IP Plus S.R.L. - Fatture rifornimenti carburante",
        identification: "IP PLUS S.R.L",
    },
    ProviderInfo {
        kind: ProviderKind::Esso,
        code: "ESSO",
        name: "Esso",
        description: "WEX Europe Services - Esso Card",
        identification: "WEX Europe Services / ESSO CARD",
    },
    ProviderInfo {
        kind: ProviderKind::Q8,
        code: "Q8",
        name: "Q8",
        description: "Kuwait Petroleum Italia - CartissimaQ8",
        identification: "Kuwait Petroleum Italia / CartissimaQ8",
    },
    ProviderInfo {
        kind: ProviderKind::Tamoil,
        code: "TAMOIL",
        name: "Tamoil",
        description: "Tamoil Italia S.p.A. - mycard",
        identification: "TAMOIL ITALIA S.p.A. / mycard",
    },
];

/// The fixed list of providers recognized by the detector.
pub fn supported_providers() -> &'static [ProviderInfo] {
    &PROVIDERS
}

/// One refueling event in canonical form.
///
/// Records are only built by [`crate::invoice::Normalizer`], which enforces
/// every invariant; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelRecord {
    plate: String,
    refuel_date: NaiveDate,
    quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_price: Option<Decimal>,
    total_amount: Decimal,
    provider: ProviderKind,
    source_file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    refuel_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    odometer_km: Option<u32>,
    product: String,
    receipt_number: String,
    station_code: String,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_number: Option<String>,
}

/// Supplementary, unvalidated row details carried into a record.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordDetails {
    pub refuel_time: Option<NaiveTime>,
    pub odometer_km: Option<u32>,
    pub product: String,
    pub receipt_number: String,
    pub station_code: String,
    pub location: String,
    pub card_number: Option<String>,
}

impl FuelRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        plate: String,
        refuel_date: NaiveDate,
        quantity: Decimal,
        unit_price: Option<Decimal>,
        total_amount: Decimal,
        provider: ProviderKind,
        source_file: String,
        details: RecordDetails,
    ) -> Self {
        Self {
            plate,
            refuel_date,
            quantity,
            unit_price,
            total_amount,
            provider,
            source_file,
            refuel_time: details.refuel_time,
            odometer_km: details.odometer_km,
            product: details.product,
            receipt_number: details.receipt_number,
            station_code: details.station_code,
            location: details.location,
            card_number: details.card_number,
        }
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn refuel_date(&self) -> NaiveDate {
        self.refuel_date
    }

    /// Liters.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Price per liter, when the invoice states one.
    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn refuel_time(&self) -> Option<NaiveTime> {
        self.refuel_time
    }

    pub fn odometer_km(&self) -> Option<u32> {
        self.odometer_km
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn station_code(&self) -> &str {
        &self.station_code
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn card_number(&self) -> Option<&str> {
        self.card_number.as_deref()
    }
}

/// Invoice-level data found alongside the line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Billed company, when the layout prints it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Taxable amount (imponibile).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_net: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_vat: Option<Decimal>,

    /// Invoice total including VAT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_gross: Option<Decimal>,
}

impl InvoiceHeader {
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.invoice_date.is_none()
            && self.customer.is_none()
            && self.total_net.is_none()
            && self.total_vat.is_none()
            && self.total_gross.is_none()
    }
}
