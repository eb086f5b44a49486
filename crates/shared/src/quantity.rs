//! Kubernetes resource quantities
//!
//! Parses quantity strings such as `500m`, `2`, `4Gi` or `1e3` into an exact,
//! comparable value. Values are held in milli-units so CPU requests
//! (`250m`) and byte sizes (`1Ti`) compare without floating point error.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a quantity string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),

    #[error("unknown suffix in quantity {0:?}")]
    InvalidSuffix(String),

    #[error("quantity {0:?} is out of range")]
    Overflow(String),
}

/// A parsed quantity, normalized to milli-units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantity {
    millis: i128,
}

impl Quantity {
    /// Parse a quantity string
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        input.parse()
    }

    /// Value in milli-units (`1` == `1000`)
    pub fn as_millis(&self) -> i128 {
        self.millis
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis % 1000 == 0 {
            write!(f, "{}", self.millis / 1000)
        } else {
            write!(f, "{}m", self.millis)
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let number_end = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_end);

        let (mantissa, scale) = parse_decimal(number)
            .ok_or_else(|| QuantityError::InvalidNumber(input.to_string()))?;
        let (numerator, denominator) = multiplier(suffix)
            .ok_or_else(|| QuantityError::InvalidSuffix(input.to_string()))?;

        let overflow = || QuantityError::Overflow(input.to_string());
        let scaled = mantissa
            .checked_mul(numerator)
            .and_then(|v| v.checked_mul(1000))
            .ok_or_else(overflow)?;
        let divisor = denominator
            .checked_mul(10i128.checked_pow(scale).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;

        // sub-milli precision rounds up, like the API server does
        let mut millis = scaled / divisor;
        if scaled % divisor != 0 {
            millis += 1;
        }

        Ok(Self {
            millis: if negative { -millis } else { millis },
        })
    }
}

/// Splits `12.50` into mantissa `1250` and scale `2`
fn parse_decimal(number: &str) -> Option<(i128, u32)> {
    if number.is_empty() || number == "." {
        return None;
    }
    let mut parts = number.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if fraction.contains('.') {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let mantissa = digits.parse::<i128>().ok()?;
    Some((mantissa, fraction.len() as u32))
}

/// Returns the suffix multiplier as a `(numerator, denominator)` pair
fn multiplier(suffix: &str) -> Option<(i128, i128)> {
    const KI: i128 = 1024;
    let pair = match suffix {
        "" => (1, 1),
        "Ki" => (KI, 1),
        "Mi" => (KI.pow(2), 1),
        "Gi" => (KI.pow(3), 1),
        "Ti" => (KI.pow(4), 1),
        "Pi" => (KI.pow(5), 1),
        "Ei" => (KI.pow(6), 1),
        "n" => (1, 1_000_000_000),
        "u" => (1, 1_000_000),
        "m" => (1, 1_000),
        "k" => (1_000, 1),
        "M" => (1_000_000, 1),
        "G" => (1_000_000_000, 1),
        "T" => (10i128.pow(12), 1),
        "P" => (10i128.pow(15), 1),
        "E" => (10i128.pow(18), 1),
        exponent if exponent.starts_with(['e', 'E']) => {
            let power: i32 = exponent[1..].parse().ok()?;
            if power.unsigned_abs() > 18 {
                return None;
            }
            if power >= 0 {
                (10i128.pow(power as u32), 1)
            } else {
                (1, 10i128.pow(power.unsigned_abs()))
            }
        }
        _ => return None,
    };
    Some(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1_000)]
    #[case("500m", 500)]
    #[case("0.5", 500)]
    #[case("2k", 2_000_000)]
    #[case("1Ki", 1_024_000)]
    #[case("4Gi", 4 * 1024 * 1024 * 1024 * 1000)]
    #[case("1e3", 1_000_000)]
    #[case("1E", 10i128.pow(21))]
    #[case("-2", -2_000)]
    fn parses_quantities(#[case] input: &str, #[case] millis: i128) {
        assert_eq!(Quantity::parse(input).unwrap().as_millis(), millis);
    }

    #[test]
    fn rounds_sub_milli_values_up() {
        assert_eq!(Quantity::parse("1u").unwrap().as_millis(), 1);
        assert_eq!(Quantity::parse("1500n").unwrap().as_millis(), 1);
    }

    #[test]
    fn compares_across_suffixes() {
        let cpu = Quantity::parse("1500m").unwrap();
        let limit = Quantity::parse("2").unwrap();
        assert!(cpu < limit);

        let memory = Quantity::parse("1Gi").unwrap();
        let decimal = Quantity::parse("1G").unwrap();
        assert!(memory > decimal);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("10Xi")]
    #[case("Gi")]
    fn rejects_invalid_quantities(#[case] input: &str) {
        assert!(Quantity::parse(input).is_err());
    }

    #[test]
    fn displays_whole_and_fractional_values() {
        assert_eq!(Quantity::parse("3").unwrap().to_string(), "3");
        assert_eq!(Quantity::parse("250m").unwrap().to_string(), "250m");
    }
}
