//! IEEE 754-2008 128-bit decimal floating point, binary integer decimal
//! (BID) encoding.
//!
//! Only the conversions the document model needs are implemented: exact
//! parsing from and rendering to the canonical decimal string, raw byte
//! access, and integer conversion. Arithmetic is out of scope.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

const EXPONENT_BIAS: i32 = 6176;
const MAX_EXPONENT: i32 = 6111;
const MIN_EXPONENT: i32 = -6176;
const MAX_DIGITS: usize = 34;
/// 10^34 - 1
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

const SIGN_BIT: u128 = 1 << 127;
const COMBINATION_MASK: u128 = 0b11 << 125;
const INFINITY_BITS: u128 = 0b11110 << 122;
const NAN_BITS: u128 = 0b11111 << 122;
const SPECIAL_MASK: u128 = 0b11111 << 122;
const COEFFICIENT_MASK: u128 = (1 << 113) - 1;

/// A 128-bit decimal value.
///
/// Equality is representational: `1.0` and `1` have different exponents and
/// are not equal. Use [`Decimal128::normalize`] to compare numerically.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    bits: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repr {
    Finite {
        negative: bool,
        exponent: i32,
        coefficient: u128,
    },
    Infinity {
        negative: bool,
    },
    NaN,
}

impl Decimal128 {
    pub const ZERO: Decimal128 = Decimal128 {
        bits: (EXPONENT_BIAS as u128) << 113,
    };
    pub const NAN: Decimal128 = Decimal128 { bits: NAN_BITS };
    pub const INFINITY: Decimal128 = Decimal128 {
        bits: INFINITY_BITS,
    };
    pub const NEG_INFINITY: Decimal128 = Decimal128 {
        bits: SIGN_BIT | INFINITY_BITS,
    };

    /// From the little-endian byte layout used by the storage format.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self {
            bits: u128::from_le_bytes(bytes),
        }
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.bits.to_le_bytes()
    }

    /// Builds a finite value `(-1)^negative * coefficient * 10^exponent`.
    pub fn from_parts(negative: bool, exponent: i32, coefficient: u128) -> Result<Self, ValueError> {
        if coefficient > MAX_COEFFICIENT || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(ValueError::Decimal128OutOfRange(format!(
                "{}{coefficient}E{exponent}",
                if negative { "-" } else { "" }
            )));
        }
        Ok(Self::encode(negative, exponent, coefficient))
    }

    pub fn from_i64(value: i64) -> Self {
        Self::encode(value < 0, 0, u128::from(value.unsigned_abs()))
    }

    /// Exact conversion from an integer with at most 34 digits.
    pub fn from_i128(value: i128) -> Result<Self, ValueError> {
        Self::from_parts(value < 0, 0, value.unsigned_abs())
    }

    fn encode(negative: bool, exponent: i32, coefficient: u128) -> Self {
        let biased = (exponent + EXPONENT_BIAS) as u128;
        let sign = if negative { SIGN_BIT } else { 0 };
        Self {
            bits: sign | (biased << 113) | coefficient,
        }
    }

    fn repr(&self) -> Repr {
        let negative = self.bits & SIGN_BIT != 0;
        if self.bits & COMBINATION_MASK == COMBINATION_MASK {
            return match self.bits & SPECIAL_MASK {
                NAN_BITS => Repr::NaN,
                INFINITY_BITS => Repr::Infinity { negative },
                _ => {
                    // Large-coefficient form: the implied coefficient always
                    // exceeds 34 digits, so the value is a non-canonical zero.
                    let biased = ((self.bits >> 111) & 0x3fff) as i32;
                    Repr::Finite {
                        negative,
                        exponent: biased - EXPONENT_BIAS,
                        coefficient: 0,
                    }
                }
            };
        }
        let biased = ((self.bits >> 113) & 0x3fff) as i32;
        let mut coefficient = self.bits & COEFFICIENT_MASK;
        if coefficient > MAX_COEFFICIENT {
            coefficient = 0;
        }
        Repr::Finite {
            negative,
            exponent: biased - EXPONENT_BIAS,
            coefficient,
        }
    }

    pub fn is_nan(&self) -> bool {
        self.repr() == Repr::NaN
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.repr(), Repr::Infinity { .. })
    }

    pub fn is_negative(&self) -> bool {
        self.bits & SIGN_BIT != 0 && !self.is_nan()
    }

    /// Strips trailing zeros from the coefficient. Zero normalizes to
    /// positive `0`; non-finite values are returned unchanged.
    pub fn normalize(&self) -> Self {
        match self.repr() {
            Repr::Finite {
                negative,
                mut exponent,
                mut coefficient,
            } => {
                if coefficient == 0 {
                    return Self::ZERO;
                }
                while coefficient % 10 == 0 && exponent < MAX_EXPONENT {
                    coefficient /= 10;
                    exponent += 1;
                }
                Self::encode(negative, exponent, coefficient)
            }
            _ => *self,
        }
    }

    /// Integer part of a finite value, and whether a non-zero fractional
    /// part was discarded. `None` for non-finite values and for integers
    /// beyond the `i128` range.
    pub fn to_integer(&self) -> Option<(i128, bool)> {
        let Repr::Finite {
            negative,
            exponent,
            coefficient,
        } = self.repr()
        else {
            return None;
        };
        if coefficient == 0 {
            return Some((0, false));
        }
        let (magnitude, fractional) = if exponent >= 0 {
            let scale = 10u128.checked_pow(exponent as u32)?;
            (coefficient.checked_mul(scale)?, false)
        } else {
            match 10u128.checked_pow(exponent.unsigned_abs()) {
                Some(scale) => (coefficient / scale, coefficient % scale != 0),
                None => (0, true),
            }
        };
        let magnitude = i128::try_from(magnitude).ok()?;
        Some((if negative { -magnitude } else { magnitude }, fractional))
    }
}

impl Default for Decimal128 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal128({self})")
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, exponent, coefficient) = match self.repr() {
            Repr::NaN => return f.write_str("NaN"),
            Repr::Infinity { negative: true } => return f.write_str("-Infinity"),
            Repr::Infinity { negative: false } => return f.write_str("Infinity"),
            Repr::Finite {
                negative,
                exponent,
                coefficient,
            } => (negative, exponent, coefficient),
        };

        let digits = coefficient.to_string();
        let adjusted = i64::from(exponent) + digits.len() as i64 - 1;
        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }

        if exponent <= 0 && adjusted >= -6 {
            if exponent == 0 {
                out.push_str(&digits);
            } else {
                let point = digits.len() as i64 + i64::from(exponent);
                if point > 0 {
                    let (int, frac) = digits.split_at(point as usize);
                    out.push_str(int);
                    out.push('.');
                    out.push_str(frac);
                } else {
                    out.push_str("0.");
                    for _ in 0..-point {
                        out.push('0');
                    }
                    out.push_str(&digits);
                }
            }
        } else {
            let (first, rest) = digits.split_at(1);
            out.push_str(first);
            if !rest.is_empty() {
                out.push('.');
                out.push_str(rest);
            }
            out.push('E');
            if adjusted >= 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }
        f.write_str(&out)
    }
}

impl FromStr for Decimal128 {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidDecimal128(s.to_owned());
        let out_of_range = || ValueError::Decimal128OutOfRange(s.to_owned());

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if body.eq_ignore_ascii_case("infinity") || body.eq_ignore_ascii_case("inf") {
            return Ok(if negative {
                Self::NEG_INFINITY
            } else {
                Self::INFINITY
            });
        }
        if body.eq_ignore_ascii_case("nan") {
            return Ok(Self::NAN);
        }

        let (mantissa, exponent_text) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let mut digits = String::with_capacity(mantissa.len());
        let mut fraction_len: i64 = 0;
        let mut seen_point = false;
        for ch in mantissa.chars() {
            match ch {
                '0'..='9' => {
                    digits.push(ch);
                    if seen_point {
                        fraction_len += 1;
                    }
                }
                '.' if !seen_point => seen_point = true,
                _ => return Err(invalid()),
            }
        }
        if digits.is_empty() {
            return Err(invalid());
        }

        let mut exponent: i64 = match exponent_text {
            Some(text) => {
                let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
                if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                text.parse().map_err(|_| invalid())?
            }
            None => 0,
        };
        exponent = exponent.checked_sub(fraction_len).ok_or_else(out_of_range)?;

        let significant = digits.trim_start_matches('0');
        let mut significant = if significant.is_empty() { "0" } else { significant };
        if significant.len() > MAX_DIGITS {
            let excess = significant.len() - MAX_DIGITS;
            let (kept, dropped) = significant.split_at(MAX_DIGITS);
            if !dropped.bytes().all(|b| b == b'0') {
                return Err(out_of_range());
            }
            significant = kept;
            exponent = i64::try_from(excess)
                .ok()
                .and_then(|excess| exponent.checked_add(excess))
                .ok_or_else(out_of_range)?;
        }
        let mut coefficient: u128 = significant.parse().map_err(|_| invalid())?;

        while exponent > i64::from(MAX_EXPONENT) && coefficient != 0 && coefficient * 10 <= MAX_COEFFICIENT {
            coefficient *= 10;
            exponent -= 1;
        }
        while exponent < i64::from(MIN_EXPONENT) && coefficient != 0 && coefficient % 10 == 0 {
            coefficient /= 10;
            exponent += 1;
        }
        if coefficient == 0 {
            exponent = exponent.clamp(i64::from(MIN_EXPONENT), i64::from(MAX_EXPONENT));
        }
        if !(i64::from(MIN_EXPONENT)..=i64::from(MAX_EXPONENT)).contains(&exponent) {
            return Err(out_of_range());
        }

        Ok(Self::encode(negative, exponent as i32, coefficient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal128 {
        s.parse().unwrap()
    }

    #[test]
    fn renders_plain_notation() {
        assert_eq!(d("0").to_string(), "0");
        assert_eq!(d("1.0").to_string(), "1.0");
        assert_eq!(d("-12.345").to_string(), "-12.345");
        assert_eq!(d("0.001").to_string(), "0.001");
        assert_eq!(d("0.000001").to_string(), "0.000001");
        assert_eq!(d("123456").to_string(), "123456");
    }

    #[test]
    fn renders_scientific_notation() {
        assert_eq!(d("1E+3").to_string(), "1E+3");
        assert_eq!(d("1e3").to_string(), "1E+3");
        assert_eq!(d("0.0000001").to_string(), "1E-7");
        assert_eq!(d("1.5E-10").to_string(), "1.5E-10");
        assert_eq!(d("0E-10").to_string(), "0E-10");
        assert_eq!(d("-0").to_string(), "-0");
    }

    #[test]
    fn renders_specials() {
        assert_eq!(d("Infinity").to_string(), "Infinity");
        assert_eq!(d("-inf").to_string(), "-Infinity");
        assert_eq!(d("NaN").to_string(), "NaN");
        assert!(d("nan").is_nan());
    }

    #[test]
    fn render_then_parse_is_identity() {
        for s in [
            "0",
            "-0",
            "1.0",
            "3.14159",
            "-1E+3",
            "9999999999999999999999999999999999",
            "1E-6176",
            "9.999999999999999999999999999999999E+6144",
            "0E+6111",
        ] {
            let value = d(s);
            assert_eq!(d(&value.to_string()), value, "{s}");
        }
    }

    #[test]
    fn bytes_round_trip_little_endian() {
        let value = d("1");
        let bytes = value.bytes();
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[15], 0x30);
        assert_eq!(bytes[14], 0x40);
        assert_eq!(Decimal128::from_bytes(bytes), value);
    }

    #[test]
    fn clamps_exponent_when_digits_allow() {
        // 1E+6112 is representable as 10E+6111.
        assert_eq!(d("1E+6112").to_string(), "1.0E+6112");
        assert!("1E+7000".parse::<Decimal128>().is_err());
        assert!("1E-7000".parse::<Decimal128>().is_err());
    }

    #[test]
    fn rejects_malformed_and_inexact_input() {
        for s in ["", "-", ".", "1..0", "1e", "1e+", "abc", "1.2.3"] {
            assert!(s.parse::<Decimal128>().is_err(), "{s}");
        }
        assert!("12345678901234567890123456789012345".parse::<Decimal128>().is_err());
        assert_eq!(
            d("12345678901234567890123456789012340").to_string(),
            "1.234567890123456789012345678901234E+34"
        );
    }

    #[test]
    fn to_integer_reports_fraction() {
        assert_eq!(d("42").to_integer(), Some((42, false)));
        assert_eq!(d("-4.50").to_integer(), Some((-4, true)));
        assert_eq!(d("1E+3").to_integer(), Some((1000, false)));
        assert_eq!(d("2.00").to_integer(), Some((2, false)));
        assert_eq!(d("1E+40").to_integer(), None);
        assert_eq!(d("Infinity").to_integer(), None);
    }

    #[test]
    fn normalize_strips_trailing_zeros() {
        assert_eq!(d("1.000").normalize(), d("1"));
        assert_eq!(d("-0.0").normalize(), Decimal128::ZERO);
        assert_eq!(d("1200").normalize().to_string(), "1.2E+3");
    }

    #[test]
    fn extreme_exponents_are_out_of_range() {
        let below = "0.5E-9223372036854775808";
        assert_eq!(
            below.parse::<Decimal128>(),
            Err(ValueError::Decimal128OutOfRange(below.to_owned()))
        );
        let above = format!("1{}E9223372036854775807", "0".repeat(34));
        assert_eq!(
            above.parse::<Decimal128>(),
            Err(ValueError::Decimal128OutOfRange(above.clone()))
        );
    }
}
