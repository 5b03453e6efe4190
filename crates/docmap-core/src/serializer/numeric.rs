//! Checked conversions between numeric representations.

use docmap_bson::{Decimal128, Value};

use crate::error::MappingError;
use crate::native::{NativeValue, StaticType};

/// Largest magnitude of the 96-bit fixed-point `decimal` type.
const DECIMAL_MAX_MAGNITUDE: i128 = 79_228_162_514_264_337_593_543_950_335;

/// Governs what happens when a numeric value does not fit its target.
///
/// With both flags off every lossy conversion fails: out-of-range values
/// raise [`MappingError::NumericOverflow`] and values that would lose a
/// fractional part or precision raise [`MappingError::NumericTruncation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepresentationConverter {
    pub allow_overflow: bool,
    pub allow_truncation: bool,
}

impl RepresentationConverter {
    pub fn new(allow_overflow: bool, allow_truncation: bool) -> Self {
        Self {
            allow_overflow,
            allow_truncation,
        }
    }

    fn overflow(&self, value: &Numeric, target: &str) -> Result<(), MappingError> {
        if self.allow_overflow {
            Ok(())
        } else {
            Err(MappingError::NumericOverflow {
                value: value.to_string(),
                target: target.to_owned(),
            })
        }
    }

    fn truncation(&self, value: &Numeric, target: &str) -> Result<(), MappingError> {
        if self.allow_truncation {
            Ok(())
        } else {
            Err(MappingError::NumericTruncation {
                value: value.to_string(),
                target: target.to_owned(),
            })
        }
    }

    /// Integer within `[min, max]`. Overflowing values wrap (integers) or
    /// saturate (floating and decimal) when allowed.
    pub(crate) fn to_integer(&self, n: &Numeric, min: i128, max: i128, target: &str) -> Result<i128, MappingError> {
        let (whole, fractional) = match *n {
            Numeric::Int(i) => (Some(i), false),
            Numeric::Float(f) => {
                if f.is_finite() && f.abs() < 1e38 {
                    (Some(f.trunc() as i128), f.fract() != 0.0)
                } else {
                    (None, false)
                }
            }
            Numeric::Decimal(d) => match d.to_integer() {
                Some((i, frac)) => (Some(i), frac),
                None => (None, false),
            },
        };
        let Some(whole) = whole else {
            self.overflow(n, target)?;
            return Ok(match n {
                Numeric::Float(f) if *f < 0.0 => min,
                Numeric::Decimal(d) if d.is_negative() => min,
                Numeric::Float(f) if f.is_nan() => 0,
                Numeric::Decimal(d) if d.is_nan() => 0,
                _ => max,
            });
        };
        if fractional {
            self.truncation(n, target)?;
        }
        if whole < min || whole > max {
            self.overflow(n, target)?;
            if matches!(n, Numeric::Int(_)) {
                // Keep the low bits, as a narrowing cast does.
                let span = max - min + 1;
                return Ok((whole - min).rem_euclid(span) + min);
            }
            return Ok(whole.clamp(min, max));
        }
        Ok(whole)
    }

    pub(crate) fn to_f64(&self, n: &Numeric) -> Result<f64, MappingError> {
        match *n {
            Numeric::Int(i) => {
                let f = i as f64;
                if f as i128 != i {
                    self.truncation(n, "f64")?;
                }
                Ok(f)
            }
            Numeric::Float(f) => Ok(f),
            Numeric::Decimal(d) => {
                let text = d.to_string();
                let f: f64 = text.parse().map_err(|_| MappingError::InvalidValue {
                    ty: "f64".to_owned(),
                    value: text.clone(),
                })?;
                if f.is_infinite() && !d.is_infinite() {
                    self.overflow(n, "f64")?;
                } else if f.is_finite() {
                    let back = float_to_decimal(f)?;
                    if back.normalize() != d.normalize() {
                        self.truncation(n, "f64")?;
                    }
                }
                Ok(f)
            }
        }
    }

    pub(crate) fn to_f32(&self, n: &Numeric) -> Result<f32, MappingError> {
        let f = self.to_f64(n)?;
        if f.is_finite() && f.abs() > f64::from(f32::MAX) {
            self.overflow(n, "f32")?;
            return Ok(if f < 0.0 { f32::MIN } else { f32::MAX });
        }
        let narrowed = f as f32;
        if f.is_finite() && f64::from(narrowed) != f {
            self.truncation(n, "f32")?;
        }
        Ok(narrowed)
    }

    pub(crate) fn to_decimal128(&self, n: &Numeric) -> Result<Decimal128, MappingError> {
        match *n {
            Numeric::Int(i) => match Decimal128::from_i128(i) {
                Ok(d) => Ok(d),
                Err(_) => {
                    self.overflow(n, "Decimal128")?;
                    float_to_decimal(i as f64)
                }
            },
            Numeric::Float(f) => float_to_decimal(f),
            Numeric::Decimal(d) => Ok(d),
        }
    }

    /// Decimal restricted to the range of the fixed-point `decimal` type.
    pub(crate) fn to_decimal(&self, n: &Numeric) -> Result<Decimal128, MappingError> {
        let d = self.to_decimal128(n)?;
        let in_range = match d.to_integer() {
            Some((i, _)) => i.abs() <= DECIMAL_MAX_MAGNITUDE,
            None => false,
        };
        if !in_range {
            self.overflow(n, "decimal")?;
        }
        Ok(d)
    }

    /// Converts to the native type `ty`, which must be numeric.
    pub(crate) fn to_native(&self, n: &Numeric, ty: &StaticType) -> Result<NativeValue, MappingError> {
        let target = ty.to_string();
        Ok(match ty {
            StaticType::I8 => NativeValue::I8(self.to_integer(n, i8::MIN.into(), i8::MAX.into(), &target)? as i8),
            StaticType::I16 => NativeValue::I16(self.to_integer(n, i16::MIN.into(), i16::MAX.into(), &target)? as i16),
            StaticType::I32 => NativeValue::I32(self.to_integer(n, i32::MIN.into(), i32::MAX.into(), &target)? as i32),
            StaticType::I64 => NativeValue::I64(self.to_integer(n, i64::MIN.into(), i64::MAX.into(), &target)? as i64),
            StaticType::U8 => NativeValue::U8(self.to_integer(n, 0, u8::MAX.into(), &target)? as u8),
            StaticType::U16 => NativeValue::U16(self.to_integer(n, 0, u16::MAX.into(), &target)? as u16),
            StaticType::U32 => NativeValue::U32(self.to_integer(n, 0, u32::MAX.into(), &target)? as u32),
            StaticType::U64 => NativeValue::U64(self.to_integer(n, 0, u64::MAX.into(), &target)? as u64),
            StaticType::F32 => NativeValue::F32(self.to_f32(n)?),
            StaticType::F64 => NativeValue::F64(self.to_f64(n)?),
            StaticType::Decimal => NativeValue::Decimal(self.to_decimal(n)?),
            StaticType::Decimal128 => NativeValue::Decimal(self.to_decimal128(n)?),
            other => {
                return Err(MappingError::InvalidValue {
                    ty: other.to_string(),
                    value: n.to_string(),
                })
            }
        })
    }
}

/// A number lifted out of a native value or a stored element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i128),
    Float(f64),
    Decimal(Decimal128),
}

impl Numeric {
    pub(crate) fn from_native(value: &NativeValue) -> Option<Self> {
        Some(match *value {
            NativeValue::I8(v) => Numeric::Int(v.into()),
            NativeValue::I16(v) => Numeric::Int(v.into()),
            NativeValue::I32(v) => Numeric::Int(v.into()),
            NativeValue::I64(v) => Numeric::Int(v.into()),
            NativeValue::U8(v) => Numeric::Int(v.into()),
            NativeValue::U16(v) => Numeric::Int(v.into()),
            NativeValue::U32(v) => Numeric::Int(v.into()),
            NativeValue::U64(v) => Numeric::Int(v.into()),
            NativeValue::F32(v) => Numeric::Float(v.into()),
            NativeValue::F64(v) => Numeric::Float(v),
            NativeValue::Decimal(d) => Numeric::Decimal(d),
            _ => return None,
        })
    }

    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        Some(match *value {
            Value::Int32(v) => Numeric::Int(v.into()),
            Value::Int64(v) => Numeric::Int(v.into()),
            Value::Double(v) => Numeric::Float(v),
            Value::Decimal128(d) => Numeric::Decimal(d),
            _ => return None,
        })
    }

    /// Parses the text form written by the String representation of `ty`.
    pub(crate) fn parse(text: &str, ty: &StaticType) -> Option<Self> {
        if ty.is_integer() {
            text.parse::<i128>().ok().map(Numeric::Int)
        } else if matches!(ty, StaticType::F32 | StaticType::F64) {
            text.parse::<f64>().ok().map(Numeric::Float)
        } else {
            text.parse::<Decimal128>().ok().map(Numeric::Decimal)
        }
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Int(i) => write!(f, "{i}"),
            Numeric::Float(v) => write!(f, "{v}"),
            Numeric::Decimal(d) => write!(f, "{d}"),
        }
    }
}

fn float_to_decimal(f: f64) -> Result<Decimal128, MappingError> {
    if f.is_nan() {
        return Ok(Decimal128::NAN);
    }
    if f.is_infinite() {
        return Ok(if f < 0.0 {
            Decimal128::NEG_INFINITY
        } else {
            Decimal128::INFINITY
        });
    }
    let text = format!("{f:?}");
    text.parse().map_err(|_| MappingError::InvalidValue {
        ty: "Decimal128".to_owned(),
        value: text,
    })
}
