//! Fixed-point balance formatting.

use crate::error::CodecError;

/// Renders `value` base units with `decimals` implied decimal places.
///
/// The fractional part is always printed at full width, so
/// `format_balance(123_000_000_000, 9)` is `"123.000000000"`.
pub fn format_balance(value: u64, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    format!("{whole}.{frac}")
}

/// Inverse of [`format_balance`]. A shorter fractional part is accepted.
pub fn parse_balance(s: &str, decimals: u8) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidBalance(s.to_string());
    let decimals = usize::from(decimals);

    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !is_digits(whole) || !is_digits(frac) || frac.len() > decimals {
        return Err(invalid());
    }
    if s.contains('.') && frac.is_empty() {
        return Err(invalid());
    }

    let combined = format!("{whole}{frac:0<decimals$}");
    combined.parse::<u64>().map_err(|_| invalid())
}
