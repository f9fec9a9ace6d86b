//! Regex patterns for the supported fuel invoice layouts.
//!
//! Row patterns run against single lines whose whitespace has already been
//! collapsed by [`crate::pdf::RawDocument`]. Header patterns run against the
//! whole document text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Shared
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"\b(?:\d{1,3}(?:\.\d{3})+|\d+),\d+\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})$"
    ).unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})$"
    ).unwrap();

    pub static ref TIME_HM: Regex = Regex::new(
        r"^(\d{1,2}):?(\d{2})$"
    ).unwrap();

    pub static ref AMOUNT_SHAPE: Regex = Regex::new(
        r"^-?[\d.,]*\d[\d.,]*$"
    ).unwrap();

    // IP Plus
    pub static ref IP_ROW: Regex = Regex::new(concat!(
        r"^(?P<date>\d{2}/\d{2}/\d{2})\s+",
        r"(?P<time>\d{2}:\d{2})\s+",
        r"(?P<receipt>\d{8})\s+",
        r"(?P<station>\d{5})\s+",
        r"(?P<location>.+?)\s+",
        r"(?P<km>\d{1,3}(?:\.\d{3})+|\d+)\s+",
        r"0000\s+",
        r"(?P<product>GASOLIO(?:\s+SELF)?)\s+",
        r"(?P<liters>(?:\d{1,3}(?:\.\d{3})+|\d+),\d+)",
    )).unwrap();

    pub static ref IP_ROW_ANCHOR: Regex = Regex::new(
        r"^\d{2}/\d{2}/\d{2}\s+\d{2}:\d{2}\s"
    ).unwrap();

    pub static ref IP_PLATE: Regex = Regex::new(
        r"TARGA\s+([A-Z]{2}\d{3}[A-Z]{2})\b"
    ).unwrap();

    pub static ref IP_NUMBER: Regex = Regex::new(r"Nr:\s*(\d+)").unwrap();
    pub static ref IP_DATE: Regex = Regex::new(r"Data:\s*(\d{2}/\d{2}/\d{4})").unwrap();
    pub static ref IP_NET: Regex = Regex::new(r"Acquisti del periodo:\s*EUR\s*([\d.,]+)").unwrap();
    pub static ref IP_VAT: Regex = Regex::new(r"IVA\s*EUR\s*([\d.,]+)").unwrap();
    pub static ref IP_TOTAL: Regex = Regex::new(r"Totale Importo:\s*EUR\s*([\d.,]+)").unwrap();

    // Esso (WEX Europe Services)
    pub static ref ESSO_CARD: Regex = Regex::new(
        r"Carta:\s*\d+\s+(?P<plate>[A-Z]{2}\d{3}[A-Z]{2})\b(?:\s+(?P<pan>\d{10,19}))?"
    ).unwrap();

    pub static ref ESSO_ROW: Regex = Regex::new(concat!(
        r"(?i)^(?P<date>\d{2}\.\d{2}\.\d{2})\s+",
        r"(?P<ticket>\d{6})\s+",
        r"(?P<station>\d+)\s+",
        r"(?P<location>[A-Z][A-Z\s'.]*?)\s+",
        r"(?:(?P<km>\d+)\s+)?",
        r"gasolio\s+autotrazion[a-z]*\s+",
        r"(?P<quantity>(?:\d{1,3}(?:\.\d{3})+|\d+),\d+)\s+",
        r"(?:\d{1,3}(?:\.\d{3})+|\d+),\d+",
    )).unwrap();

    pub static ref ESSO_ROW_ANCHOR: Regex = Regex::new(
        r"^\d{2}\.\d{2}\.\d{2}\s+\d{6}\s"
    ).unwrap();

    pub static ref ESSO_NUMBER: Regex = Regex::new(r"(?i)Fattura No\s*:\s*(\d+)").unwrap();
    pub static ref ESSO_DATE: Regex = Regex::new(r"Data\s*:\s*(\d{2}\.\d{2}\.\d{4})").unwrap();
    pub static ref ESSO_CUSTOMER: Regex = Regex::new(r"Cliente\s*:\s*([A-Z][A-Z ]*[A-Z])").unwrap();
    pub static ref ESSO_TOTALS: Regex = Regex::new(
        r"TOTALE:\s*([\d.,]+)\s+([\d.,]+)\s+([\d.,]+)"
    ).unwrap();

    // Q8 (Kuwait Petroleum Italia)
    pub static ref Q8_ROW: Regex = Regex::new(concat!(
        r"^(?P<pan>\d{19})\s+",
        r"(?P<ticket>\d{5})\s+",
        r"(?P<date>\d{2}/\d{2}/\d{2})\s+",
        r"(?P<time>\d{4})\s+",
        r"(?P<product>[A-Z]{3})\b",
    )).unwrap();

    pub static ref Q8_ROW_ANCHOR: Regex = Regex::new(
        r"^\d{16,19}\s+\d+\s+\d{2}/\d{2}/\d{2}\s"
    ).unwrap();

    pub static ref Q8_STATION: Regex = Regex::new(
        r"\b[A-Z]{3}\s+\d{4}\s+\d+\s+(?P<station>\d+)\b"
    ).unwrap();

    pub static ref Q8_LOCATION: Regex = Regex::new(
        r"^\s*(?P<location>.+?)\s+(?:SF|SV|PP)\s"
    ).unwrap();

    pub static ref Q8_PLATE: Regex = Regex::new(
        r"TARGA/NOME\s+([A-Z]{2}\d{3}[A-Z]{2})\b"
    ).unwrap();

    pub static ref Q8_NUMBER: Regex = Regex::new(r"(?i)\bn\.\s*([A-Z0-9]+)\s+del\b").unwrap();
    pub static ref Q8_DATE: Regex = Regex::new(r"\bdel\s+(\d{2}/\d{2}/\d{2,4})").unwrap();
    pub static ref Q8_TOTALS: Regex = Regex::new(
        r"BASE IMPONIBILE\s+IVA TOTALE\s+TOTALE FATTURA\s+([\d.,]+)\s+([\d.,]+)\s+([\d.,]+)"
    ).unwrap();

    // Tamoil
    pub static ref TAMOIL_ROW: Regex = Regex::new(concat!(
        r"^S\s+",
        r"(?P<station>\d+)\s+",
        r"(?P<location>[A-Z][A-Z\s()'.]*?)\s+",
        r"(?P<auth>\d+)\s+",
        r"(?P<date>\d{2}/\d{2}/\d{4})\s+",
        r"(?P<time>\d{2}:\d{2})\s+",
        r"(?P<km>\d+)\s+",
        r"(?P<product>.+?)\s+",
        r"LT\s+",
        r"(?P<quantity>(?:\d{1,3}(?:\.\d{3})+|\d+),\d+)\s+",
        r"(?P<amount>(?:\d{1,3}(?:\.\d{3})+|\d+),\d+)",
    )).unwrap();

    pub static ref TAMOIL_ROW_ANCHOR: Regex = Regex::new(r"^S\s+\d+\s").unwrap();

    pub static ref TAMOIL_PLATE: Regex = Regex::new(
        r"(?:Carta\s+(?P<pan>\d{10,19})\s+)?Targa\s+(?P<plate>[A-Z]{2}\d{3}[A-Z]{2})\b"
    ).unwrap();

    pub static ref TAMOIL_NUMBER: Regex = Regex::new(r"Fattura N[°º.]?\s*([A-Z0-9]+)").unwrap();
    pub static ref TAMOIL_CUSTOMER: Regex = Regex::new(
        r"Cliente:\s*Spett\.\s*([A-Z][A-Z ]*[A-Z])"
    ).unwrap();
    pub static ref TAMOIL_DATE: Regex = Regex::new(r"Data fattura\s*(\d{2}/\d{2}/\d{4})").unwrap();
    pub static ref TAMOIL_NET: Regex = Regex::new(r"Imponibile IVA\s*EUR\s*([\d.,]+)").unwrap();
    pub static ref TAMOIL_VAT: Regex = Regex::new(r"Importo IVA\s*EUR\s*([\d.,]+)").unwrap();
    pub static ref TAMOIL_TOTAL: Regex = Regex::new(r"Totale Fattura.*?EUR\s*([\d.,]+)").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_token() {
        let found: Vec<&str> = AMOUNT_TOKEN
            .find_iter("45,20 1,789 1.234,56 0000 12")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["45,20", "1,789", "1.234,56"]);
    }

    #[test]
    fn test_ip_row_pattern() {
        let line = "01/10/25 08:15 12345678 00123 ROMA VIA SALARIA 123.456 0000 GASOLIO SELF 45,20 1,789 80,86";
        let caps = IP_ROW.captures(line).unwrap();
        assert_eq!(&caps["location"], "ROMA VIA SALARIA");
        assert_eq!(&caps["km"], "123.456");
        assert_eq!(&caps["product"], "GASOLIO SELF");
        assert_eq!(&caps["liters"], "45,20");
    }

    #[test]
    fn test_esso_row_without_km() {
        let line = "07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50 1,599 42,50";
        let caps = ESSO_ROW.captures(line).unwrap();
        assert_eq!(&caps["location"], "CITTADUCALE");
        assert!(caps.name("km").is_none());
        assert_eq!(&caps["quantity"], "26,58");
    }

    #[test]
    fn test_tamoil_location_with_province() {
        let line = "S 8478 SACROFANO (RM) 674676 01/10/2025 09:55 1 Gasolio Self LT 61,92 101,49";
        let caps = TAMOIL_ROW.captures(line).unwrap();
        assert_eq!(&caps["location"], "SACROFANO (RM)");
        assert_eq!(&caps["product"], "Gasolio Self");
        assert_eq!(&caps["amount"], "101,49");
    }
}
