use std::str::FromStr;

use super::{Cell, Row, Tone};
use crate::core::codec::hex_to_signed_int;
use crate::core::parser::RegisterSnapshot;
use crate::core::register::{RegisterInfo, RegisterType};
use crate::{Error, Result};

/// Interpretation of a 64-bit MMX register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MmxFormat {
    /// One 64-bit hex cell.
    #[default]
    Hex,
    /// 2 signed 32-bit lanes.
    Int32,
    /// 4 signed 16-bit lanes.
    Int16,
    /// 8 signed 8-bit lanes.
    Int8,
}

impl MmxFormat {
    fn lane_bits(self) -> Option<u32> {
        match self {
            MmxFormat::Hex => None,
            MmxFormat::Int32 => Some(32),
            MmxFormat::Int16 => Some(16),
            MmxFormat::Int8 => Some(8),
        }
    }
}

impl FromStr for MmxFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(MmxFormat::Hex),
            "int32" => Ok(MmxFormat::Int32),
            "int16" => Ok(MmxFormat::Int16),
            "int8" => Ok(MmxFormat::Int8),
            _ => Err(Error::InvalidOption {
                option: "MMX format",
                value: s.to_string(),
            }),
        }
    }
}

fn lane_cells(hex: &str, bits: u32, color: bool) -> Vec<Cell> {
    let width = (bits / 4) as usize;

    hex.as_bytes()
        .chunks(width)
        .enumerate()
        .map(|(index, chunk)| {
            let chunk = std::str::from_utf8(chunk).unwrap_or_default();
            let (text, tone) = match hex_to_signed_int(chunk, bits) {
                Ok(value) if color => (value.to_string(), Tone::of(value as f64)),
                Ok(value) => (value.to_string(), Tone::Plain),
                Err(_) if color => (chunk.to_string(), Tone::Error),
                Err(_) => (chunk.to_string(), Tone::Plain),
            };
            Cell {
                text,
                tone,
                index: Some(index),
            }
        })
        .collect()
}

/// Render `mm0..mm7`. Lanes run from the most significant end of the register.
pub fn render_mmx(snapshot: &RegisterSnapshot, format: MmxFormat, color: bool) -> Vec<Row> {
    RegisterInfo::registers_of(RegisterType::Mmx)
        .filter_map(|info| {
            let record = snapshot.mmx(info.name)?;
            let digits = info.size * 2;
            let cells = match format.lane_bits() {
                None => vec![Cell::plain(format!("0x{:0>digits$}", record.hex))],
                Some(bits) => lane_cells(&record.hex, bits, color),
            };
            Some(Row::new(info.name, cells))
        })
        .collect()
}
