//! Layout-specific parsers, one per supported provider.

mod esso;
mod ip;
mod q8;
mod tamoil;

pub use esso::EssoParser;
pub use ip::IpParser;
pub use q8::Q8Parser;
pub use tamoil::TamoilParser;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use super::ProviderParser;
use super::rules::{parse_amount, parse_date};
use crate::models::record::ProviderKind;

static IP: IpParser = IpParser;
static ESSO: EssoParser = EssoParser;
static Q8: Q8Parser = Q8Parser;
static TAMOIL: TamoilParser = TamoilParser;

/// Parser for a detected provider; `None` for [`ProviderKind::Unknown`].
pub fn parser_for(kind: ProviderKind) -> Option<&'static dyn ProviderParser> {
    match kind {
        ProviderKind::Ip => Some(&IP),
        ProviderKind::Esso => Some(&ESSO),
        ProviderKind::Q8 => Some(&Q8),
        ProviderKind::Tamoil => Some(&TAMOIL),
        ProviderKind::Unknown => None,
    }
}

fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim())
}

fn capture_string(re: &Regex, text: &str) -> Option<String> {
    capture(re, text, 1).map(str::to_string)
}

fn capture_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    capture(re, text, 1).and_then(parse_date)
}

fn capture_amount(re: &Regex, text: &str, group: usize) -> Option<Decimal> {
    capture(re, text, group).and_then(parse_amount)
}
