//! Numeric extraction from formatted offer strings.
//!
//! Backend records and partner feeds carry amounts as display strings:
//! "19,99 €", "19€99", "20 Go", "1 Gb/s", "Illimité". Every function here
//! returns `0.0` for input it cannot read so one bad field never fails a
//! whole listing.

use crate::money::{Currency, Money};

/// Split a formatted string into its first number and the unit that
/// immediately follows it (lowercased letters and `/`).
///
/// Spaces (plain, NBSP, narrow NBSP) between digits of the integer part
/// group thousands. When `,` and `.` both appear, the last one is the
/// decimal separator and the others group thousands; a single separator is
/// decimal and a repeated one groups. A `€` between two digit runs is
/// decimal too ("19€99").
pub fn split_quantity(raw: &str) -> (f64, String) {
    let mut digits = String::new();
    let mut separators: Vec<(usize, char)> = Vec::new();
    let mut euro_decimal = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            continue;
        }
        let next_is_digit = chars.peek().is_some_and(|n| n.is_ascii_digit());
        match c {
            ',' | '.' if !euro_decimal && next_is_digit => separators.push((digits.len(), c)),
            '\u{20ac}' if separators.is_empty() && next_is_digit => {
                separators.push((digits.len(), c));
                euro_decimal = true;
            }
            ' ' | '\u{a0}' | '\u{202f}' if separators.is_empty() && next_is_digit => {}
            _ => {
                let unit: String = std::iter::once(c)
                    .chain(chars)
                    .skip_while(|ch| ch.is_whitespace())
                    .take_while(|ch| ch.is_alphabetic() || *ch == '/')
                    .collect();
                return (assemble(&digits, &separators), unit.to_lowercase());
            }
        }
    }

    (assemble(&digits, &separators), String::new())
}

fn assemble(digits: &str, separators: &[(usize, char)]) -> f64 {
    let decimal_at = match separators {
        [] => None,
        [only] => Some(only.0),
        [.., last] if separators.iter().any(|(_, c)| *c != last.1) => Some(last.0),
        _ => None,
    };
    let number = match decimal_at {
        Some(at) => format!("{}.{}", &digits[..at], &digits[at..]),
        None => digits.to_string(),
    };
    number.parse().unwrap_or(0.0)
}

/// Extract the first numeric amount from a formatted string.
///
/// ```
/// use comparo_catalog::parse::parse_amount;
/// assert_eq!(parse_amount("19,99 €"), 19.99);
/// assert_eq!(parse_amount("20 Go"), 20.0);
/// assert_eq!(parse_amount("sur devis"), 0.0);
/// ```
pub fn parse_amount(raw: &str) -> f64 {
    split_quantity(raw).0
}

/// Parse a formatted price into euros.
pub fn parse_price(raw: &str) -> Money {
    Money::from_decimal(parse_amount(raw), Currency::EUR)
}

/// Parse a bandwidth string into Mb/s.
///
/// Gb/s values are scaled by 1000 and Kb/s values divided by 1000; a bare
/// number or any other unit is taken as Mb/s.
pub fn parse_speed_mbps(raw: &str) -> f64 {
    let (amount, unit) = split_quantity(raw);
    if unit.starts_with('g') {
        amount * 1000.0
    } else if unit.starts_with('k') {
        amount / 1000.0
    } else {
        amount
    }
}

/// Parse a data allowance into gigabytes.
///
/// Unlimited allowances sort above every finite one.
pub fn parse_data_gb(raw: &str) -> f64 {
    let lower = raw.to_lowercase();
    if lower.contains("illimit") || lower.contains("unlimited") {
        return f64::INFINITY;
    }

    let (amount, unit) = split_quantity(raw);
    if unit.starts_with('m') {
        amount / 1000.0
    } else if unit.starts_with('t') {
        amount * 1000.0
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("19.99\u{20ac}"), 19.99);
        assert_eq!(parse_amount("19,99 \u{20ac}"), 19.99);
        assert_eq!(parse_amount("19\u{20ac}99"), 19.99);
        assert_eq!(parse_amount("1 299,00 \u{20ac}"), 1299.0);
        assert_eq!(parse_amount("1\u{a0}099 \u{20ac}"), 1099.0);
        assert_eq!(parse_amount("A partir de 9,99\u{20ac}/mois"), 9.99);
    }

    #[test]
    fn test_parse_amount_grouped_thousands() {
        assert_eq!(parse_amount("1.299,00 \u{20ac}"), 1299.0);
        assert_eq!(parse_amount("1,299.50"), 1299.5);
        assert_eq!(parse_amount("1.234.567,89 \u{20ac}"), 1_234_567.89);
        assert_eq!(parse_amount("1.299.000"), 1_299_000.0);
        assert_eq!(parse_price("1.299,00 \u{20ac}").amount_cents, 129_900);
    }

    #[test]
    fn test_parse_amount_defaults_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("Illimité"), 0.0);
        assert_eq!(parse_amount("gratuit"), 0.0);
    }

    #[test]
    fn test_split_quantity_unit() {
        assert_eq!(split_quantity("20 Go"), (20.0, "go".to_string()));
        assert_eq!(split_quantity("500Mo"), (500.0, "mo".to_string()));
        assert_eq!(split_quantity("1 Gb/s"), (1.0, "gb/s".to_string()));
        assert_eq!(split_quantity("42"), (42.0, String::new()));
    }

    #[test]
    fn test_parse_speed_normalizes_units() {
        assert_eq!(parse_speed_mbps("1 Gb/s"), 1000.0);
        assert_eq!(parse_speed_mbps("8 Gbit/s"), 8000.0);
        assert_eq!(parse_speed_mbps("300 Mb/s"), 300.0);
        assert_eq!(parse_speed_mbps("512 Kb/s"), 0.512);
        assert_eq!(parse_speed_mbps("n/a"), 0.0);
    }

    #[test]
    fn test_parse_data_allowance() {
        assert_eq!(parse_data_gb("20 Go"), 20.0);
        assert_eq!(parse_data_gb("100GB"), 100.0);
        assert_eq!(parse_data_gb("500 Mo"), 0.5);
        assert_eq!(parse_data_gb("1 To"), 1000.0);
        assert_eq!(parse_data_gb("Illimité"), f64::INFINITY);
        assert_eq!(parse_data_gb("?"), 0.0);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("9,99 \u{20ac}").amount_cents, 999);
        assert!(parse_price("offert").is_zero());
    }
}
