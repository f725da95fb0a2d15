//! Bit-level conversions between hexadecimal lane text and numeric values.
//!
//! GDB prints vector lanes either as `0x`-prefixed raw bits or as already
//! decoded decimal literals. Every function here accepts both where it makes
//! sense and never needs context beyond the lane text and its [`ValueType`].

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Numeric interpretation of a single lane or scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Two's-complement signed integer of the given bit width.
    Int(u32),
    /// IEEE-754 binary32.
    Float,
    /// IEEE-754 binary64.
    Double,
}

impl ValueType {
    /// Width of the value in bits.
    pub fn bits(self) -> u32 {
        match self {
            ValueType::Int(bits) => bits,
            ValueType::Float => 32,
            ValueType::Double => 64,
        }
    }

    /// Whether the value is a floating-point interpretation.
    pub fn is_floating(self) -> bool {
        !matches!(self, ValueType::Int(_))
    }
}

/// Base used when displaying a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericBase {
    /// Base 10 (decoded floats, signed integers).
    #[default]
    Dec,
    /// Base 16 raw bits.
    Hex,
}

impl FromStr for NumericBase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dec" => Ok(NumericBase::Dec),
            "hex" => Ok(NumericBase::Hex),
            _ => Err(Error::InvalidOption {
                option: "numeric base",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NumericBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBase::Dec => f.write_str("dec"),
            NumericBase::Hex => f.write_str("hex"),
        }
    }
}

/// Returns `true` if `text` is a `0x`-prefixed literal.
pub fn is_hex_literal(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("0x") || text.starts_with("0X")
}

/// Parse a hexadecimal literal (optional `0x` prefix) of up to 128 bits.
fn parse_hex(hex: &str) -> Result<u128> {
    let trimmed = hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 32 {
        return Err(Error::MalformedHex(hex.to_string()));
    }

    u128::from_str_radix(digits, 16).map_err(|_| Error::MalformedHex(hex.to_string()))
}

fn check_width(bit_width: u32) -> Result<()> {
    match bit_width {
        8 | 16 | 32 | 64 => Ok(()),
        _ => Err(Error::UnsupportedWidth(bit_width)),
    }
}

/// Reinterpret the low 32 bits of a hex literal as IEEE-754 binary32.
pub fn hex_to_float32(hex: &str) -> Result<f32> {
    Ok(f32::from_bits(parse_hex(hex)? as u32))
}

/// Reinterpret the low 64 bits of a hex literal as IEEE-754 binary64.
pub fn hex_to_float64(hex: &str) -> Result<f64> {
    Ok(f64::from_bits(parse_hex(hex)? as u64))
}

/// Encode `value` as binary32 and render its bits as `0x` plus 8 uppercase digits.
pub fn float_to_hex(value: f32) -> String {
    format!("0x{:08X}", value.to_bits())
}

/// Encode `value` as binary64 and render its bits as `0x` plus 16 uppercase digits.
pub fn double_to_hex(value: f64) -> String {
    format!("0x{:016X}", value.to_bits())
}

/// Parse a hex literal as unsigned, keep the low `bit_width` bits, and apply
/// the two's-complement adjustment.
pub fn hex_to_signed_int(hex: &str, bit_width: u32) -> Result<i64> {
    check_width(bit_width)?;

    let modulus = 1u128 << bit_width;
    let value = parse_hex(hex)? & (modulus - 1);

    let signed = if value >= modulus / 2 {
        value as i128 - modulus as i128
    } else {
        value as i128
    };

    Ok(signed as i64)
}

/// Wrap a signed integer into its unsigned two's-complement encoding at `bit_width`.
pub fn wrap_to_width(value: i128, bit_width: u32) -> Result<u128> {
    check_width(bit_width)?;

    let modulus = 1i128 << bit_width;
    Ok(value.rem_euclid(modulus) as u128)
}

/// Raw bit pattern of a lane, whichever way GDB printed it.
pub fn lane_to_bits(text: &str, value_type: ValueType) -> Result<u64> {
    let clean = text.trim();

    if is_hex_literal(clean) {
        return u64::try_from(parse_hex(clean)?)
            .map_err(|_| Error::MalformedHex(clean.to_string()));
    }

    match value_type {
        ValueType::Int(bits) => {
            let value: i128 = clean
                .parse()
                .map_err(|_| Error::MalformedNumber(clean.to_string()))?;
            Ok(wrap_to_width(value, bits)? as u64)
        }
        ValueType::Float => Ok((parse_decimal(clean)? as f32).to_bits() as u64),
        ValueType::Double => parse_decimal(clean).map(f64::to_bits),
    }
}

fn parse_decimal(clean: &str) -> Result<f64> {
    let value = get_actual_number(clean, ValueType::Double);
    if value.is_nan() && !clean.to_ascii_lowercase().contains("nan") {
        return Err(Error::MalformedNumber(clean.to_string()));
    }
    Ok(value)
}

/// Display entry point: render `text` of type `value_type` in `base`.
///
/// Decimal input stays as is for [`NumericBase::Dec`]. Hex input stays as is
/// (digits uppercased) for [`NumericBase::Hex`]. Otherwise the value is
/// converted through its bit pattern: floats keep 6 significant digits,
/// doubles 12, and integers are sign-adjusted to their width.
pub fn format_number(text: &str, value_type: ValueType, base: NumericBase) -> Result<String> {
    let clean = text.trim();
    let hex_input = is_hex_literal(clean);

    match (base, hex_input) {
        (NumericBase::Dec, false) => Ok(clean.to_string()),
        (NumericBase::Dec, true) => match value_type {
            ValueType::Float => Ok(to_precision(hex_to_float32(clean)? as f64, 6)),
            ValueType::Double => Ok(to_precision(hex_to_float64(clean)?, 12)),
            ValueType::Int(bits) => Ok(hex_to_signed_int(clean, bits)?.to_string()),
        },
        (NumericBase::Hex, true) => Ok(format!("0x{}", clean[2..].to_ascii_uppercase())),
        (NumericBase::Hex, false) => match value_type {
            ValueType::Float => Ok(float_to_hex(get_actual_number(clean, value_type) as f32)),
            ValueType::Double => Ok(double_to_hex(get_actual_number(clean, value_type))),
            ValueType::Int(bits) => match clean.parse::<i128>() {
                Ok(value) => Ok(format!("0x{:X}", wrap_to_width(value, bits)?)),
                Err(_) => Ok(clean.to_string()),
            },
        },
    }
}

/// Decode a lane to its numeric value for comparison and colouring.
///
/// `nan` and `inf` anywhere in the text win over any other decoding. A lane
/// that cannot be decoded yields NaN.
pub fn get_actual_number(text: &str, value_type: ValueType) -> f64 {
    let clean = text.trim().to_ascii_lowercase();

    if clean.contains("nan") {
        return f64::NAN;
    }
    if clean.contains("inf") {
        return if clean.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    if is_hex_literal(&clean) {
        let decoded = match value_type {
            ValueType::Float => hex_to_float32(&clean).map(f64::from),
            ValueType::Double => hex_to_float64(&clean),
            ValueType::Int(bits) => hex_to_signed_int(&clean, bits).map(|v| v as f64),
        };
        return decoded.unwrap_or(f64::NAN);
    }

    clean.parse().unwrap_or(f64::NAN)
}

/// Render `value` with `digits` significant digits, trimming trailing zeros
/// from the fraction. Switches to exponent notation outside `1e-6..1e<digits>`.
pub(crate) fn to_precision(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -6 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
