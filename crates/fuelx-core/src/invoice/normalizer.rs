//! Conversion of raw row strings into validated [`FuelRecord`]s.

use chrono::{Days, Local, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use super::RawFields;
use super::rules::{parse_amount, parse_date, parse_integer, parse_time, round_to};
use crate::error::ValidationError;
use crate::models::config::ValidationConfig;
use crate::models::record::{FuelRecord, ProviderKind, RecordDetails};

/// Odometer readings above this are misprints.
const MAX_ODOMETER_KM: u64 = 10_000_000;

/// Largest quantity, price or total accepted on a single row.
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

type Result<T> = std::result::Result<T, ValidationError>;

/// Validates raw fields and builds canonical records.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: ValidationConfig,
    reference_date: NaiveDate,
}

impl Normalizer {
    /// Create a normalizer that validates dates against today.
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            reference_date: Local::now().date_naive(),
        }
    }

    /// Validate dates against a fixed day instead of today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Build a record from one parsed row.
    ///
    /// Quantity and total are rounded to 2 decimals, unit price to 3. When
    /// a unit price is present, quantity x unit price must match the total
    /// within the configured tolerance plus the rounding slack of a 3-decimal
    /// price.
    pub fn normalize(
        &self,
        raw: &RawFields,
        provider: ProviderKind,
        source_file: &str,
    ) -> Result<FuelRecord> {
        let plate = normalize_plate(raw.plate.as_deref().unwrap_or_default())?;
        let refuel_date = self.refuel_date(&raw.date)?;

        let quantity = positive_amount("quantity", &raw.quantity, 2)?;
        let unit_price = raw
            .unit_price
            .as_deref()
            .map(|price| positive_amount("unit_price", price, 3))
            .transpose()?;
        let total_amount = positive_amount("total_amount", &raw.total_amount, 2)?;

        if let Some(price) = unit_price {
            self.check_consistency(quantity, price, total_amount)?;
        }

        let details = RecordDetails {
            refuel_time: raw.time.as_deref().map(refuel_time).transpose()?,
            odometer_km: raw.odometer.as_deref().and_then(odometer),
            product: raw.product.trim().to_string(),
            receipt_number: raw.receipt_number.trim().to_string(),
            station_code: raw.station_code.trim().to_string(),
            location: raw.location.trim().to_string(),
            card_number: raw.card_number.clone(),
        };

        Ok(FuelRecord::new(
            plate,
            refuel_date,
            quantity,
            unit_price,
            total_amount,
            provider,
            source_file.to_string(),
            details,
        ))
    }

    fn refuel_date(&self, raw: &str) -> Result<NaiveDate> {
        let date = parse_date(raw)
            .ok_or_else(|| ValidationError::new("refuel_date", format!("unparseable date {raw:?}")))?;

        if date < self.config.min_date {
            return Err(ValidationError::new(
                "refuel_date",
                format!("{} is before {}", date, self.config.min_date),
            ));
        }

        let latest = self
            .reference_date
            .checked_add_days(Days::new(u64::from(self.config.max_future_days)))
            .ok_or_else(|| {
                ValidationError::new(
                    "refuel_date",
                    format!(
                        "no date {} days after {}",
                        self.config.max_future_days, self.reference_date
                    ),
                )
            })?;
        if date > latest {
            return Err(ValidationError::new(
                "refuel_date",
                format!("{} is after {}", date, latest),
            ));
        }

        Ok(date)
    }

    fn check_consistency(&self, quantity: Decimal, price: Decimal, total: Decimal) -> Result<()> {
        let out_of_range = || ValidationError::new("total_amount", "out of range");
        let expected = quantity.checked_mul(price).ok_or_else(out_of_range)?;
        let tolerance = quantity
            .checked_mul(Decimal::new(5, 4))
            .and_then(|slack| slack.checked_add(self.config.amount_tolerance))
            .ok_or_else(out_of_range)?;
        if (expected - total).abs() > tolerance {
            return Err(ValidationError::new(
                "total_amount",
                format!(
                    "{} does not match {} x {} = {} (tolerance {})",
                    total,
                    quantity,
                    price,
                    round_to(expected, 2),
                    round_to(tolerance, 4)
                ),
            ));
        }
        Ok(())
    }
}

/// Uppercase a plate and strip spaces and hyphens.
pub fn normalize_plate(raw: &str) -> Result<String> {
    let plate: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if plate.is_empty() {
        return Err(ValidationError::new("plate", "missing"));
    }
    if !plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new(
            "plate",
            format!("{raw:?} is not alphanumeric"),
        ));
    }
    Ok(plate)
}

fn positive_amount(field: &str, raw: &str, dp: u32) -> Result<Decimal> {
    let value = parse_amount(raw)
        .ok_or_else(|| ValidationError::new(field, format!("unparseable amount {raw:?}")))?;
    let value = round_to(value, dp);
    if value <= Decimal::ZERO {
        return Err(ValidationError::new(
            field,
            format!("{raw:?} is not positive"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::new(field, format!("{raw:?} is out of range")));
    }
    Ok(value)
}

fn refuel_time(raw: &str) -> Result<NaiveTime> {
    parse_time(raw)
        .ok_or_else(|| ValidationError::new("refuel_time", format!("unparseable time {raw:?}")))
}

/// Readings of 0 or 1 mean the driver entered nothing.
fn odometer(raw: &str) -> Option<u32> {
    parse_integer(raw)
        .filter(|km| *km > 1 && *km <= MAX_ODOMETER_KM)
        .and_then(|km| u32::try_from(km).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(ValidationConfig::default())
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 10, 20).unwrap())
    }

    fn q8_row() -> RawFields {
        RawFields {
            plate: Some("el 934-ba".to_string()),
            date: "02/10/25".to_string(),
            time: Some("08:52".to_string()),
            receipt_number: "00002".to_string(),
            station_code: "5817".to_string(),
            location: "NEROLA".to_string(),
            odometer: None,
            product: "GASOLIO".to_string(),
            quantity: "45,76".to_string(),
            unit_price: Some("1,639".to_string()),
            total_amount: "75,00".to_string(),
            card_number: Some("7028009864300015041".to_string()),
        }
    }

    #[test]
    fn test_normalize_record() {
        let record = normalizer()
            .normalize(&q8_row(), ProviderKind::Q8, "q8.pdf")
            .unwrap();

        assert_eq!(record.plate(), "EL934BA");
        assert_eq!(record.refuel_date(), NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
        assert_eq!(record.quantity(), dec("45.76"));
        assert_eq!(record.unit_price(), Some(dec("1.639")));
        assert_eq!(record.total_amount(), dec("75.00"));
        assert_eq!(record.provider(), ProviderKind::Q8);
        assert_eq!(record.source_file(), "q8.pdf");
        assert_eq!(record.refuel_time(), NaiveTime::from_hms_opt(8, 52, 0));
        assert_eq!(record.card_number(), Some("7028009864300015041"));
        assert_eq!(record.odometer_km(), None);
    }

    #[test]
    fn test_amounts_are_rounded() {
        let mut row = q8_row();
        row.unit_price = None;
        row.quantity = "45,756".to_string();
        row.total_amount = "74,995".to_string();
        let record = normalizer().normalize(&row, ProviderKind::Tamoil, "t.pdf").unwrap();
        assert_eq!(record.quantity(), dec("45.76"));
        assert_eq!(record.total_amount(), dec("75.00"));
    }

    #[test]
    fn test_inconsistent_total_is_rejected() {
        let mut row = q8_row();
        row.total_amount = "80,00".to_string();
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "total_amount");
    }

    #[test]
    fn test_price_rounding_slack() {
        // 100 l at 1,6385 printed as 1,639: off by 0,05, within 0,01 + 0,05
        let mut row = q8_row();
        row.quantity = "100,00".to_string();
        row.total_amount = "163,85".to_string();
        assert!(normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").is_ok());
    }

    #[test]
    fn test_non_positive_amounts() {
        let mut row = q8_row();
        row.quantity = "0,00".to_string();
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "quantity");

        let mut row = q8_row();
        row.unit_price = None;
        row.total_amount = "-5,00".to_string();
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "total_amount");
    }

    #[test]
    fn test_date_range() {
        let mut row = q8_row();
        row.date = "01/12/1999".to_string();
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "refuel_date");

        // 31 days past the reference date is the last accepted day
        row.date = "20/11/2025".to_string();
        assert!(normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").is_ok());
        row.date = "21/11/2025".to_string();
        assert!(normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").is_err());

        row.date = "32/10/25".to_string();
        assert!(normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").is_err());
    }

    #[test]
    fn test_plate_rules() {
        assert_eq!(normalize_plate(" ab 123-cd ").unwrap(), "AB123CD");
        assert_eq!(normalize_plate("").unwrap_err().reason, "missing");
        assert!(normalize_plate("AB*123").is_err());

        let mut row = q8_row();
        row.plate = None;
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "plate");
    }

    #[test]
    fn test_odometer() {
        assert_eq!(odometer("123.456"), Some(123_456));
        assert_eq!(odometer("1"), None);
        assert_eq!(odometer("0"), None);
        assert_eq!(odometer("12.000.001"), None);
        assert_eq!(odometer("n/d"), None);
    }

    #[test]
    fn test_huge_amounts_are_out_of_range() {
        let mut row = q8_row();
        row.quantity = "1,00".to_string();
        row.total_amount = "99999999999999999999,00".to_string();
        row.unit_price = Some("9999999999,000".to_string());
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "unit_price");
        assert!(err.reason.contains("out of range"));

        row.unit_price = None;
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "total_amount");
    }

    #[test]
    fn test_consistency_overflow_is_an_error() {
        let normalizer = normalizer();
        let big = Decimal::MAX;
        let err = normalizer.check_consistency(big, dec("2"), dec("1")).unwrap_err();
        assert_eq!(err, ValidationError::new("total_amount", "out of range"));
    }

    #[test]
    fn test_unbounded_future_window_is_an_error() {
        let config = ValidationConfig {
            max_future_days: u32::MAX,
            ..ValidationConfig::default()
        };
        let normalizer = Normalizer::new(config)
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
        let err = normalizer.normalize(&q8_row(), ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "refuel_date");
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let mut row = q8_row();
        row.time = Some("99:99".to_string());
        let err = normalizer().normalize(&row, ProviderKind::Q8, "q8.pdf").unwrap_err();
        assert_eq!(err.field, "refuel_time");
    }
}
