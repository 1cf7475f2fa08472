//! Input validation for `name=value` pairs.
//!
//! Validation happens in two passes. [`validate_format`] checks the raw text
//! is structurally a single pair; [`check_pair`] then applies the character
//! and naming rules to the trimmed halves.

use crate::{error::Result, Error};

/// Separator between the name and the value.
pub const SEPARATOR: char = '=';

/// Shortest input that can hold a name, the separator and a value.
const MIN_INPUT_LEN: usize = 3;

/// Check that `raw` is structurally a single `name=value` pair.
///
/// Returns `Ok(true)` when `raw` contains exactly one separator that is
/// neither the first nor the last character. Input of two characters or
/// fewer is a contract violation and fails with [`Error::Format`]. Length is
/// counted in UTF-16 code units, as a browser host measures its input.
pub fn validate_format(raw: &str) -> Result<bool> {
    let len = raw.encode_utf16().count();
    if len < MIN_INPUT_LEN {
        return Err(Error::Format(raw.to_string()));
    }

    let mut separators = raw.char_indices().filter(|(_, c)| *c == SEPARATOR);
    let valid = match (separators.next(), separators.next()) {
        (Some((pos, _)), None) => pos > 0 && pos < raw.len() - SEPARATOR.len_utf8(),
        _ => false,
    };

    Ok(valid)
}

/// Split a pair on its separator and trim both halves.
///
/// Fails with [`Error::Format`] unless [`validate_format`] accepts `raw`.
pub fn split_pair(raw: &str) -> Result<(&str, &str)> {
    if !validate_format(raw)? {
        return Err(Error::Format(raw.to_string()));
    }

    match raw.split_once(SEPARATOR) {
        Some((name, value)) => Ok((name.trim(), value.trim())),
        None => Err(Error::Format(raw.to_string())),
    }
}

/// Apply the character and naming rules to a trimmed pair.
///
/// Characters are checked on both halves before the name is checked for
/// being numeric.
pub fn check_pair(name: &str, value: &str) -> Result<()> {
    if !is_alphanumeric(name) || !is_alphanumeric(value) {
        return Err(Error::Charset(format!("{}{}{}", name, SEPARATOR, value)));
    }

    check_name(name)
}

/// Apply the naming rules to a name on its own.
pub fn check_name(name: &str) -> Result<()> {
    if !is_alphanumeric(name) {
        return Err(Error::Charset(name.to_string()));
    }

    if is_numeric(name) {
        return Err(Error::NameIsNumeric {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// True if `s` is non-empty and made only of `0-9`, `A-Z` and `a-z`.
pub fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// True if `s` reads as a finite number.
pub fn is_numeric(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Parse `s` as a finite number.
///
/// Accepts decimal literals with an optional exponent (`12`, `007`, `1e3`)
/// and `0x`, `0o` and `0b` prefixed integers. Non-finite results such as
/// `Infinity` or `NaN` are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    let n = match radix {
        Some(radix) => parse_radix(&s[2..], radix)?,
        None => s.parse::<f64>().ok()?,
    };

    n.is_finite().then_some(n)
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
