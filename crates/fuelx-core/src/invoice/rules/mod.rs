//! Rule-based field parsing shared by the provider parsers.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{find_amounts, format_amount, last_amount, parse_amount, parse_integer, round_to};
pub use dates::{parse_date, parse_time};
