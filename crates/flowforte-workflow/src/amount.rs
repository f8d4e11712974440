//! Decimal amount scaling and fixed-point helpers.
//!
//! Amounts arrive as human-readable decimals ("50", "0.25", "1e-6") and are
//! converted to integer base units without ever passing through `f64`.

use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use serde::{Serialize, Serializer};

use crate::error::{Result, WorkflowError};

/// Largest exponent accepted in scientific notation.
const MAX_EXPONENT: i64 = 96;

/// How to treat fractional digits beyond the target precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Exact,
    Floor,
}

/// Unsigned decimal split at its decimal point, exponent already applied.
struct Decimal {
    whole: String,
    fraction: String,
}

fn parse_decimal(amount: &str) -> Result<Decimal> {
    let text = amount.trim();
    if text.starts_with('-') {
        return Err(WorkflowError::invalid_amount(amount, "amount must not be negative"));
    }
    let text = text.strip_prefix('+').unwrap_or(text);

    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(index) => {
            let exponent = text[index + 1..]
                .parse::<i64>()
                .map_err(|_| WorkflowError::invalid_amount(amount, "malformed exponent"))?;
            if exponent.abs() > MAX_EXPONENT {
                return Err(WorkflowError::invalid_amount(amount, "exponent out of range"));
            }
            (&text[..index], exponent)
        }
        None => (text, 0),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(WorkflowError::invalid_amount(amount, "not a decimal number"));
    }

    let mut digits = format!("{whole}{fraction}");
    let mut point = whole.len() as i64 + exponent;
    if point < 0 {
        digits.insert_str(0, &"0".repeat(point.unsigned_abs() as usize));
        point = 0;
    }
    let point = point as usize;
    if point > digits.len() {
        digits.push_str(&"0".repeat(point - digits.len()));
    }

    let (whole, fraction) = digits.split_at(point);
    Ok(Decimal {
        whole: whole.to_string(),
        fraction: fraction.to_string(),
    })
}

fn to_base_units(amount: &str, decimals: u32, precision: Precision) -> Result<U256> {
    let Decimal { whole, fraction } = parse_decimal(amount)?;
    let places = decimals as usize;

    let mut fraction = fraction.trim_end_matches('0');
    if fraction.len() > places {
        match precision {
            Precision::Exact => {
                return Err(WorkflowError::invalid_amount(
                    amount,
                    format!("more than {decimals} fractional digits would be lost"),
                ))
            }
            Precision::Floor => fraction = &fraction[..places],
        }
    }

    let digits = format!("{whole}{fraction:0<places$}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits)
        .map_err(|_| WorkflowError::invalid_amount(amount, "does not fit in 256 bits"))
}

/// Scale a decimal amount to integer base units (`amount * 10^decimals`).
///
/// Fails instead of truncating when the amount carries more fractional digits
/// than `decimals`.
pub fn scale(amount: &str, decimals: u32) -> Result<U256> {
    to_base_units(amount, decimals, Precision::Exact)
}

/// Render base units as the shortest exact decimal string.
pub fn unscale(value: U256, decimals: u32) -> String {
    let (whole, fraction) = split_digits(value, decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Render base units with exactly `places` fractional digits, truncating.
pub fn format_fixed(value: U256, decimals: u32, places: usize) -> String {
    let (whole, fraction) = split_digits(value, decimals);
    let fraction: String = fraction.chars().take(places).collect();
    if places == 0 {
        whole
    } else {
        format!("{whole}.{fraction:0<places$}")
    }
}

fn split_digits(value: U256, decimals: u32) -> (String, String) {
    let places = decimals as usize;
    let padded = format!("{:0>width$}", value.to_string(), width = places + 1);
    let (whole, fraction) = padded.split_at(padded.len() - places);
    (whole.to_string(), fraction.to_string())
}

/// Serde adapter writing a `U256` as a plain decimal string.
pub mod base_units {
    use ethers::types::U256;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

/// Unsigned 18-decimal fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wad(U256);

impl Wad {
    pub const DECIMALS: u32 = 18;

    pub fn one() -> Self {
        Self(U256::exp10(Self::DECIMALS as usize))
    }

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> U256 {
        self.0
    }

    /// Parse a decimal, flooring digits past the 18th.
    pub fn parse_floor(value: &str) -> Result<Self> {
        to_base_units(value, Self::DECIMALS, Precision::Floor).map(Self)
    }

    pub fn to_fixed(self, places: usize) -> String {
        format_fixed(self.0, Self::DECIMALS, places)
    }
}

impl FromStr for Wad {
    type Err = WorkflowError;

    fn from_str(value: &str) -> Result<Self> {
        scale(value, Self::DECIMALS).map(Self)
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&unscale(self.0, Self::DECIMALS))
    }
}

impl Serialize for Wad {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maximum tolerated price movement, a fraction in `[0, 1)`.
///
/// Limited to 8 fractional digits so it survives conversion to Cadence
/// `UFix64` unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slippage(Wad);

impl Slippage {
    pub const MAX_PLACES: u32 = 8;

    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: String| WorkflowError::InvalidSlippage {
            value: value.to_string(),
            reason,
        };

        let wad = value.parse::<Wad>().map_err(|err| match err {
            WorkflowError::InvalidAmount { reason, .. } => invalid(reason),
            other => invalid(other.to_string()),
        })?;
        if wad >= Wad::one() {
            return Err(invalid("must be below 1".to_string()));
        }
        let quantum = U256::exp10((Wad::DECIMALS - Self::MAX_PLACES) as usize);
        if !(wad.raw() % quantum).is_zero() {
            return Err(invalid(format!(
                "more than {} fractional digits",
                Self::MAX_PLACES
            )));
        }
        Ok(Self(wad))
    }

    pub fn as_wad(self) -> Wad {
        self.0
    }

    /// `UFix64` literal, e.g. `0.01000000`.
    pub fn to_ufix64(self) -> String {
        self.0.to_fixed(Self::MAX_PLACES as usize)
    }

    /// Percentage without trailing zeros, e.g. `1` for 0.01.
    pub fn percent(self) -> String {
        unscale(self.0.raw() * U256::from(100u8), Wad::DECIMALS)
    }
}

impl Default for Slippage {
    /// One percent.
    fn default() -> Self {
        Self(Wad(U256::exp10(16)))
    }
}

impl FromStr for Slippage {
    type Err = WorkflowError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Slippage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_whole_and_fractional() {
        assert_eq!(scale("50", 18).unwrap(), U256::exp10(18) * U256::from(50u8));
        assert_eq!(scale("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(scale("0.1", 18).unwrap(), U256::exp10(17));
        assert_eq!(scale(".5", 1).unwrap(), U256::from(5u8));
        assert_eq!(scale("7.", 2).unwrap(), U256::from(700u16));
        assert_eq!(scale("0", 18).unwrap(), U256::zero());
        assert_eq!(scale(" 2.50 ", 1).unwrap(), U256::from(25u8));
    }

    #[test]
    fn test_scale_scientific_notation() {
        assert_eq!(scale("1e-7", 18).unwrap(), U256::exp10(11));
        assert_eq!(scale("1.5E3", 0).unwrap(), U256::from(1500u16));
        assert_eq!(scale("2.5e-1", 6).unwrap(), U256::from(250_000u64));
    }

    #[test]
    fn test_scale_rejects_precision_loss() {
        let err = scale("1.0000001", 6).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidAmount { .. }));
        assert!(err.to_string().contains("fractional digits"));
        // trailing zeros are not precision
        assert!(scale("1.0000000", 6).is_ok());
    }

    #[test]
    fn test_scale_rejects_negative_and_garbage() {
        assert!(matches!(scale("-1", 18), Err(WorkflowError::InvalidAmount { .. })));
        assert!(matches!(scale("abc", 18), Err(WorkflowError::InvalidAmount { .. })));
        assert!(matches!(scale("", 18), Err(WorkflowError::InvalidAmount { .. })));
        assert!(matches!(scale("1.2.3", 18), Err(WorkflowError::InvalidAmount { .. })));
        assert!(matches!(scale("1e999", 18), Err(WorkflowError::InvalidAmount { .. })));
    }

    #[test]
    fn test_scale_overflow() {
        let too_big = format!("1{}", "0".repeat(78));
        assert!(matches!(scale(&too_big, 0), Err(WorkflowError::InvalidAmount { .. })));
    }

    #[test]
    fn test_unscale_round_trip() {
        for (amount, decimals) in [("50", 18), ("0.000001", 6), ("123.456", 6), ("0", 18), ("42", 0)] {
            let base = scale(amount, decimals).unwrap();
            assert_eq!(unscale(base, decimals), amount);
            assert_eq!(scale(&unscale(base, decimals), decimals).unwrap(), base);
        }
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(U256::exp10(16), 18, 8), "0.01000000");
        assert_eq!(format_fixed(U256::from(1_704_103_200u64), 0, 1), "1704103200.0");
        assert_eq!(format_fixed(U256::from(123_456_789u64), 6, 2), "123.45");
    }

    #[test]
    fn test_wad_parse_floor() {
        let price = Wad::parse_floor("0.1234567890123456789").unwrap();
        assert_eq!(price.raw(), U256::from(123_456_789_012_345_678u64));
        assert!("0.1234567890123456789".parse::<Wad>().is_err());
        assert_eq!("2.0".parse::<Wad>().unwrap().to_string(), "2");
    }

    #[test]
    fn test_slippage_bounds() {
        assert_eq!(Slippage::parse("0").unwrap().as_wad(), Wad::zero());
        assert_eq!(Slippage::parse("0.01").unwrap(), Slippage::default());
        assert!(matches!(Slippage::parse("1"), Err(WorkflowError::InvalidSlippage { .. })));
        assert!(matches!(Slippage::parse("1.5"), Err(WorkflowError::InvalidSlippage { .. })));
        assert!(matches!(Slippage::parse("-0.1"), Err(WorkflowError::InvalidSlippage { .. })));
        assert!(matches!(
            Slippage::parse("0.000000001"),
            Err(WorkflowError::InvalidSlippage { .. })
        ));
    }

    #[test]
    fn test_slippage_rendering() {
        let slippage = Slippage::parse("0.005").unwrap();
        assert_eq!(slippage.percent(), "0.5");
        assert_eq!(slippage.to_ufix64(), "0.00500000");
        assert_eq!(Slippage::default().percent(), "1");
        assert_eq!(Slippage::parse("0.07").unwrap().percent(), "7");
    }
}
