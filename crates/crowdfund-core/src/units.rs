//! Token amount conversions between wei and ether
//!
//! On-chain amounts are integers in the smallest token unit ("wei").
//! The UI works in ether (`wei / 10^18`). Two representations are kept:
//!
//! - [`WeiAmount`]: exact, arbitrary-width, used for re-display and for
//!   anything that is compared or sent back to the contract
//! - `f64` ether values: display and arithmetic only
//!
//! # Conversion paths
//!
//! [`normalize_amount`] divides directly when the amount has at most 18
//! digits, and splits the digit string into integer and fractional parts
//! when it is longer. Both paths are kept as-is.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of decimals between wei and ether
pub const ETHER_DECIMALS: usize = 18;

const WEI_PER_ETHER: f64 = 1e18;

// ── WeiAmount ─────────────────────────────────────────────

/// An exact non-negative amount in wei.
///
/// Stored as a canonical decimal digit string (no leading zeros, `"0"` for
/// zero) so values beyond `u128` survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeiAmount(String);

impl WeiAmount {
    pub fn zero() -> Self {
        WeiAmount("0".to_string())
    }

    /// Parse decimal digits (optional leading `+`) or `0x`-prefixed hex.
    ///
    /// Returns `None` for anything else, including negative values.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return hex_to_decimal(hex).map(|digits| Self::from_digits(&digits));
        }
        let digits = text.strip_prefix('+').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::from_digits(digits))
    }

    /// Build from a string already known to be all ASCII digits.
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self::zero()
        } else {
            WeiAmount(trimmed.to_string())
        }
    }

    /// Canonical decimal digits
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// Derived ether value, for display and arithmetic only
    pub fn to_ether(&self) -> f64 {
        normalize_amount(&self.0)
    }

    /// The value as `u128`, if it fits
    pub fn to_u128(&self) -> Option<u128> {
        self.0.parse().ok()
    }
}

impl Default for WeiAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u128> for WeiAmount {
    fn from(value: u128) -> Self {
        WeiAmount(value.to_string())
    }
}

impl From<u64> for WeiAmount {
    fn from(value: u64) -> Self {
        WeiAmount(value.to_string())
    }
}

impl From<WeiAmount> for String {
    fn from(amount: WeiAmount) -> Self {
        amount.0
    }
}

impl TryFrom<String> for WeiAmount {
    type Error = Error;

    fn try_from(text: String) -> Result<Self> {
        text.parse()
    }
}

impl FromStr for WeiAmount {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        WeiAmount::parse(text)
            .ok_or_else(|| Error::InvalidAmount(format!("'{}' is not a wei amount", text)))
    }
}

impl Ord for WeiAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        // canonical form: longer digit string is the larger number
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for WeiAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WeiAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Wei → ether ───────────────────────────────────────────

/// Convert a wei amount given as integer text into an ether float.
///
/// Total: malformed text yields `0.0`. A leading `-` is carried through.
pub fn normalize_amount(amount: &str) -> f64 {
    let text = amount.trim();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let cleaned = magnitude.trim_start_matches('0');
    if cleaned.is_empty() {
        return 0.0;
    }
    if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        tracing::debug!(amount, "non-numeric wei amount, using 0");
        return 0.0;
    }

    let value = if cleaned.len() <= ETHER_DECIMALS {
        cleaned.parse::<f64>().unwrap_or(0.0) / WEI_PER_ETHER
    } else {
        let (int_part, frac_part) = cleaned.split_at(cleaned.len() - ETHER_DECIMALS);
        let frac_part = frac_part.trim_end_matches('0');
        let decimal = if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        };
        decimal.parse::<f64>().unwrap_or(0.0)
    };

    if negative {
        -value
    } else {
        value
    }
}

/// Exact decimal rendering of a wei amount in ether (`"1.5"`, `"1200"`).
pub fn format_ether(amount: &WeiAmount) -> String {
    let digits = amount.as_str();
    let (int_part, frac_part) = if digits.len() > ETHER_DECIMALS {
        let (i, f) = digits.split_at(digits.len() - ETHER_DECIMALS);
        (i.to_string(), f.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = ETHER_DECIMALS))
    };

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

// ── Ether → wei ───────────────────────────────────────────

/// Convert user-entered ether text (`"1.5"`, `"100"`, `".25"`) into wei.
///
/// Fraction digits beyond the 18th are rounded half-up.
///
/// # Errors
/// `InvalidAmount` for empty, negative, or non-decimal input.
pub fn parse_ether(text: &str) -> Result<WeiAmount> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidAmount("amount is empty".into()));
    }
    if text.starts_with('-') {
        return Err(Error::InvalidAmount(format!(
            "'{}' is negative; amounts must be positive",
            text
        )));
    }

    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(Error::InvalidAmount(format!(
            "'{}' is not a decimal number",
            text
        )));
    }

    let kept: String = frac_part.chars().take(ETHER_DECIMALS).collect();
    let round_up = frac_part
        .as_bytes()
        .get(ETHER_DECIMALS)
        .is_some_and(|d| *d >= b'5');

    let mut digits = format!("{}{:0<width$}", int_part, kept, width = ETHER_DECIMALS);
    if round_up {
        digits = increment_decimal(&digits);
    }
    Ok(WeiAmount::from_digits(&digits))
}

// ── Display formatting ────────────────────────────────────

/// Render an ether float for list cards: thousands separators and at most
/// four fraction digits (`1234.56789` → `"1,234.5679"`).
pub fn format_display(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let fixed = format!("{:.4}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

// ── Digit helpers ─────────────────────────────────────────

fn hex_to_decimal(hex: &str) -> Option<String> {
    // little-endian base-10 digits
    let mut digits: Vec<u8> = vec![0];
    for ch in hex.chars() {
        let mut carry = ch.to_digit(16)?;
        for d in digits.iter_mut() {
            let v = u32::from(*d) * 16 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    Some(digits.iter().rev().map(|d| char::from(b'0' + d)).collect())
}

fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0) * 4.0
    }

    // ── normalize_amount ───────────────────────────────

    #[test]
    fn test_normalize_amount_short_path() {
        assert_eq!(normalize_amount("1500000000000000000"), 1.5);
        assert_eq!(normalize_amount("1000000000000000000"), 1.0);
        assert_eq!(normalize_amount("1"), 1e-18);
    }

    #[test]
    fn test_normalize_amount_long_path() {
        assert_eq!(normalize_amount("1000000000000000000000"), 1000.0);
        assert_eq!(normalize_amount("5000000000000000000000"), 5000.0);
        assert_eq!(normalize_amount("1200500000000000000000"), 1200.5);
    }

    #[test]
    fn test_normalize_amount_zero_and_garbage() {
        assert_eq!(normalize_amount(""), 0.0);
        assert_eq!(normalize_amount("0"), 0.0);
        assert_eq!(normalize_amount("0000"), 0.0);
        assert_eq!(normalize_amount("-0"), 0.0);
        assert_eq!(normalize_amount("12abc"), 0.0);
        assert_eq!(normalize_amount("1.5"), 0.0);
    }

    #[test]
    fn test_normalize_amount_strips_leading_zeros() {
        assert_eq!(normalize_amount("0001500000000000000000"), 1.5);
    }

    #[test]
    fn test_normalize_amount_preserves_sign() {
        assert_eq!(normalize_amount("-1500000000000000000"), -1.5);
        assert_eq!(normalize_amount("-2000000000000000000000"), -2000.0);
    }

    proptest! {
        #[test]
        fn prop_short_amounts_divide_directly(s in "[1-9][0-9]{0,17}") {
            let expected = s.parse::<f64>().unwrap() / 1e18;
            prop_assert!(close(normalize_amount(&s), expected));
        }

        #[test]
        fn prop_long_amounts_split_exactly(int in "[1-9][0-9]{0,8}", frac in "[0-9]{18}") {
            let value = normalize_amount(&format!("{}{}", int, frac));
            let expected: f64 = format!("{}.{}", int, frac).parse().unwrap();
            prop_assert!(close(value, expected));
            let reparsed: f64 = value.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, value);
        }

        #[test]
        fn prop_parse_then_format_is_exact(int in "[0-9]{1,12}", frac in "[0-9]{0,18}") {
            let text = if frac.is_empty() { int.clone() } else { format!("{}.{}", int, frac) };
            let wei = parse_ether(&text).unwrap();
            let back: f64 = format_ether(&wei).parse().unwrap();
            let orig: f64 = text.parse().unwrap();
            prop_assert!(close(back, orig));
        }
    }

    // ── WeiAmount ──────────────────────────────────────

    #[test]
    fn test_wei_parse_decimal_and_hex() {
        assert_eq!(WeiAmount::parse("0042").unwrap().as_str(), "42");
        assert_eq!(WeiAmount::parse("+7").unwrap().as_str(), "7");
        assert_eq!(
            WeiAmount::parse("0x0de0b6b3a7640000").unwrap().as_str(),
            "1000000000000000000"
        );
        assert_eq!(WeiAmount::parse("0x").unwrap(), WeiAmount::zero());
        assert!(WeiAmount::parse("-5").is_none());
        assert!(WeiAmount::parse("0xzz").is_none());
        assert!(WeiAmount::parse("").is_none());
    }

    #[test]
    fn test_wei_ordering_is_numeric() {
        let small = WeiAmount::from(999u64);
        let big = WeiAmount::parse("1000").unwrap();
        let huge = WeiAmount::parse("340282366920938463463374607431768211456000").unwrap();
        assert!(small < big);
        assert!(big < huge);
        assert_eq!(huge.to_u128(), None);
    }

    #[test]
    fn test_wei_serde_as_string() {
        let amount = WeiAmount::from(1_500_000_000_000_000_000u128);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1500000000000000000\"");
        let back: WeiAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
        assert!(serde_json::from_str::<WeiAmount>("\"1.5\"").is_err());
    }

    // ── format_ether / parse_ether ─────────────────────

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(&WeiAmount::zero()), "0");
        assert_eq!(format_ether(&WeiAmount::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(format_ether(&WeiAmount::from(1u64)), "0.000000000000000001");
        assert_eq!(
            format_ether(&WeiAmount::parse("5000000000000000000000").unwrap()),
            "5000"
        );
    }

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1.5").unwrap().as_str(), "1500000000000000000");
        assert_eq!(parse_ether("100").unwrap().as_str(), "100000000000000000000");
        assert_eq!(parse_ether(".25").unwrap().as_str(), "250000000000000000");
        assert_eq!(parse_ether("0").unwrap(), WeiAmount::zero());
        assert_eq!(parse_ether(" 2 ").unwrap().as_str(), "2000000000000000000");
    }

    #[test]
    fn test_parse_ether_rounds_extra_digits() {
        assert_eq!(parse_ether("0.0000000000000000015").unwrap().as_str(), "2");
        assert_eq!(parse_ether("0.0000000000000000014").unwrap().as_str(), "1");
        assert_eq!(
            parse_ether("0.9999999999999999999").unwrap().as_str(),
            "1000000000000000000"
        );
    }

    #[test]
    fn test_parse_ether_rejects_bad_input() {
        for bad in ["", "-1", "abc", "1.2.3", ".", "1e18", "1,000"] {
            assert!(
                matches!(parse_ether(bad), Err(Error::InvalidAmount(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    // ── format_display ─────────────────────────────────

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(0.0), "0");
        assert_eq!(format_display(1200.0), "1,200");
        assert_eq!(format_display(1234567.5), "1,234,567.5");
        assert_eq!(format_display(0.123456), "0.1235");
        assert_eq!(format_display(-2500.25), "-2,500.25");
        assert_eq!(format_display(-0.00001), "0");
        assert_eq!(format_display(f64::NAN), "0");
    }

    #[test]
    fn test_increment_decimal_carries() {
        assert_eq!(increment_decimal("199"), "200");
        assert_eq!(increment_decimal("999"), "1000");
    }
}
