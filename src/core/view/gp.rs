use std::str::FromStr;

use super::{Cell, Row};
use crate::core::codec::{ValueType, lane_to_bits};
use crate::core::parser::RegisterSnapshot;
use crate::core::register::{RegisterInfo, RegisterType};
use crate::{Error, Result};

/// Display format of the general-purpose table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpFormat {
    /// `0x`-prefixed hex as printed by GDB.
    #[default]
    Hex,
    /// Decimal as printed by GDB.
    Dec,
    /// 64 binary digits in space-separated bytes.
    Bin,
}

impl FromStr for GpFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(GpFormat::Hex),
            "dec" => Ok(GpFormat::Dec),
            "bin" => Ok(GpFormat::Bin),
            _ => Err(Error::InvalidOption {
                option: "general-purpose format",
                value: s.to_string(),
            }),
        }
    }
}

fn grouped_binary(value: u64) -> String {
    let bits = format!("{value:064b}");
    bits.as_bytes()
        .chunks(8)
        .map(|byte| std::str::from_utf8(byte).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render every general-purpose register present in `snapshot`.
pub fn render_gp(snapshot: &RegisterSnapshot, format: GpFormat) -> Vec<Row> {
    RegisterInfo::registers_of(RegisterType::GeneralPurpose)
        .filter_map(|info| {
            let record = snapshot.scalar(info.name)?;
            let text = match format {
                GpFormat::Hex => record.hex.clone(),
                GpFormat::Dec => record.decimal.clone(),
                GpFormat::Bin => grouped_binary(lane_to_bits(&record.hex, ValueType::Int(64)).ok()?),
            };
            Some(Row::new(info.name, vec![Cell::plain(text)]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_dump;

    #[test]
    fn rows_follow_architectural_order() {
        let snapshot = parse_dump("rcx 0x3 3\nrax 0x1 1\ncs 0x33 51");
        let labels: Vec<_> = render_gp(&snapshot, GpFormat::Hex)
            .into_iter()
            .map(|row| row.label)
            .collect();
        assert_eq!(labels, ["rax", "rcx"]);
    }

    #[test]
    fn hex_and_decimal() {
        let snapshot = parse_dump("rbx 0xffffffffffffffff -1");
        assert_eq!(render_gp(&snapshot, GpFormat::Hex)[0].cells[0].text, "0xffffffffffffffff");
        assert_eq!(render_gp(&snapshot, GpFormat::Dec)[0].cells[0].text, "-1");
    }

    #[test]
    fn binary_is_grouped_by_byte() {
        let snapshot = parse_dump("rax 0x8001 32769");
        assert_eq!(
            render_gp(&snapshot, GpFormat::Bin)[0].cells[0].text,
            "00000000 00000000 00000000 00000000 00000000 00000000 10000000 00000001"
        );
    }
}
