//! Amount parsing for Italian-formatted invoices.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::{AMOUNT_SHAPE, AMOUNT_TOKEN};

/// Parse an Italian-formatted amount (e.g. "1.234,56", "45,20", "1234.56").
///
/// When both separators appear the last one is the decimal separator. A
/// lone dot followed by exactly three digits is a thousands separator, as
/// Italian invoices print it.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches("EUR")
        .trim_start_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if !AMOUNT_SHAPE.is_match(&cleaned) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) => cleaned,
        (1, _) if cleaned.rfind(',') > cleaned.rfind('.') => {
            // 1.234,56
            let (int_part, _) = cleaned.split_once(',')?;
            if !is_grouped(int_part, '.') {
                return None;
            }
            cleaned.replace('.', "").replace(',', ".")
        }
        (_, 1) if commas > 0 && cleaned.rfind('.') > cleaned.rfind(',') => {
            // 1,234.56
            let (int_part, _) = cleaned.split_once('.')?;
            if !is_grouped(int_part, ',') {
                return None;
            }
            cleaned.replace(',', "")
        }
        (0, 1) => {
            let decimals = cleaned.len() - cleaned.rfind('.').map_or(0, |p| p + 1);
            if decimals == 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (0, _) if is_grouped(&cleaned, '.') => cleaned.replace('.', ""),
        _ => return None,
    };

    Decimal::from_str(&normalized).ok()
}

/// True when `sep` splits the integer part into thousands groups.
fn is_grouped(int_part: &str, sep: char) -> bool {
    let digits = int_part.trim_start_matches('-');
    if !digits.contains(sep) {
        return true;
    }
    let mut groups = digits.split(sep);
    groups.next().is_some_and(|head| (1..=3).contains(&head.len()))
        && groups.all(|group| group.len() == 3)
}

/// Parse an integer that may carry dot thousands separators ("123.456").
pub fn parse_integer(s: &str) -> Option<u64> {
    let cleaned = s.trim().replace('.', "");
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// All comma-decimal amounts on a line, in order.
pub fn find_amounts(line: &str) -> Vec<&str> {
    AMOUNT_TOKEN.find_iter(line).map(|m| m.as_str()).collect()
}

/// The right-most comma-decimal amount on a line.
pub fn last_amount(line: &str) -> Option<&str> {
    AMOUNT_TOKEN.find_iter(line).last().map(|m| m.as_str())
}

/// Round half away from zero, the way invoices round.
pub fn round_to(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with a fixed number of decimals and the given separator,
/// without thousands grouping.
pub fn format_amount(amount: Decimal, dp: u32, decimal_separator: char) -> String {
    let s = format!("{:.*}", dp as usize, round_to(amount, dp));
    if decimal_separator == '.' {
        s
    } else {
        s.replace('.', &decimal_separator.to_string())
    }
}
