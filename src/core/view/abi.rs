//! Function-argument registers under the Windows x64 and System V calling
//! conventions.

use std::str::FromStr;

use crate::core::codec::{NumericBase, ValueType, format_number};
use crate::core::lane::LaneFormat;
use crate::core::parser::RegisterSnapshot;
use crate::{Error, Result};

/// Shown when an argument register is missing from the snapshot.
pub const PLACEHOLDER: &str = "???";

/// Calling convention used to map argument slots to registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows x64: `rcx, rdx, r8, r9` / `xmm0..xmm3`.
    Windows,
    /// System V AMD64: `rdi, rsi, rdx, rcx, r8, r9` / `xmm0..xmm5`.
    Linux,
}

impl Platform {
    /// Platform of the host running the viewer.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Argument slots in order.
    pub fn slots(self) -> &'static [AbiSlot] {
        match self {
            Platform::Windows => WINDOWS_SLOTS,
            Platform::Linux => LINUX_SLOTS,
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "win" => Ok(Platform::Windows),
            "lin" => Ok(Platform::Linux),
            _ => Err(Error::InvalidOption {
                option: "platform",
                value: s.to_string(),
            }),
        }
    }
}

/// Registers carrying one function argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiSlot {
    /// 1-based argument number.
    pub index: usize,
    /// Register for integer and pointer arguments.
    pub int_register: &'static str,
    /// Register for floating-point arguments.
    pub float_register: &'static str,
}

const fn slot(index: usize, int_register: &'static str, float_register: &'static str) -> AbiSlot {
    AbiSlot {
        index,
        int_register,
        float_register,
    }
}

const WINDOWS_SLOTS: &[AbiSlot] = &[
    slot(1, "rcx", "xmm0"),
    slot(2, "rdx", "xmm1"),
    slot(3, "r8", "xmm2"),
    slot(4, "r9", "xmm3"),
];

const LINUX_SLOTS: &[AbiSlot] = &[
    slot(1, "rdi", "xmm0"),
    slot(2, "rsi", "xmm1"),
    slot(3, "rdx", "xmm2"),
    slot(4, "rcx", "xmm3"),
    slot(5, "r8", "xmm4"),
    slot(6, "r9", "xmm5"),
];

/// Interpretation of the floating-point argument register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatView {
    /// Lane 0 as binary32.
    #[default]
    Float,
    /// Lane 0 as binary64.
    Double,
    /// Lane 0 of the float view as raw bits.
    Hex,
}

impl FloatView {
    fn formats(self) -> [LaneFormat; 2] {
        match self {
            FloatView::Double => [LaneFormat::V2Double, LaneFormat::V4Double],
            FloatView::Float | FloatView::Hex => [LaneFormat::V4Float, LaneFormat::V8Float],
        }
    }
}

impl FromStr for FloatView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "float" => Ok(FloatView::Float),
            "double" => Ok(FloatView::Double),
            "hex" => Ok(FloatView::Hex),
            _ => Err(Error::InvalidOption {
                option: "float view",
                value: s.to_string(),
            }),
        }
    }
}

/// Rendered argument slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiRow {
    /// 1-based argument number.
    pub index: usize,
    /// Integer register name.
    pub int_register: &'static str,
    /// Integer register value, or [`PLACEHOLDER`].
    pub int_value: String,
    /// Float register name.
    pub float_register: &'static str,
    /// Float register lane 0, or [`PLACEHOLDER`].
    pub float_value: String,
}

/// Lane 0 of `xmmN` under `view`, falling back to `ymmN`.
fn float_lane<'a>(snapshot: &'a RegisterSnapshot, xmm: &str, view: FloatView) -> Option<&'a str> {
    let lookup = |name: &str| {
        let record = snapshot.vector(name)?;
        view.formats()
            .into_iter()
            .find_map(|format| record.get(format))
    };

    let lanes = lookup(xmm).or_else(|| lookup(&xmm.replacen("xmm", "ymm", 1)))?;
    lanes.first().map(String::as_str)
}

/// Render the argument registers of `platform`.
pub fn render_abi(
    snapshot: &RegisterSnapshot,
    platform: Platform,
    int_base: NumericBase,
    float_view: FloatView,
) -> Vec<AbiRow> {
    let (value_type, float_base) = match float_view {
        FloatView::Float => (ValueType::Float, NumericBase::Dec),
        FloatView::Double => (ValueType::Double, NumericBase::Dec),
        FloatView::Hex => (ValueType::Float, NumericBase::Hex),
    };

    platform
        .slots()
        .iter()
        .map(|slot| {
            let int_value = snapshot
                .scalar(slot.int_register)
                .and_then(|record| format_number(&record.hex, ValueType::Int(64), int_base).ok())
                .unwrap_or_else(|| PLACEHOLDER.to_string());

            let float_value = float_lane(snapshot, slot.float_register, float_view)
                .and_then(|lane| format_number(lane, value_type, float_base).ok())
                .unwrap_or_else(|| PLACEHOLDER.to_string());

            AbiRow {
                index: slot.index,
                int_register: slot.int_register,
                int_value,
                float_register: slot.float_register,
                float_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_dump;

    #[test]
    fn missing_registers_render_placeholders() {
        let rows = render_abi(
            &RegisterSnapshot::default(),
            Platform::Linux,
            NumericBase::Hex,
            FloatView::Float,
        );
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].int_register, "rdi");
        assert_eq!(rows[0].int_value, PLACEHOLDER);
        assert_eq!(rows[0].float_value, PLACEHOLDER);
    }

    #[test]
    fn windows_maps_four_slots() {
        let rows = render_abi(
            &RegisterSnapshot::default(),
            Platform::Windows,
            NumericBase::Dec,
            FloatView::Double,
        );
        let ints: Vec<_> = rows.iter().map(|row| row.int_register).collect();
        assert_eq!(ints, ["rcx", "rdx", "r8", "r9"]);
    }

    #[test]
    fn integer_and_float_arguments() {
        let snapshot = parse_dump(
            "rdi 0xffffffffffffffff -1\nxmm0 {v4_float = {0x3fc00000, 0x0, 0x0, 0x0}, v2_double = {0x3ff8000000000000, 0x0}}",
        );

        let rows = render_abi(&snapshot, Platform::Linux, NumericBase::Dec, FloatView::Float);
        assert_eq!(rows[0].int_value, "-1");
        assert_eq!(rows[0].float_value, "1.5");

        let rows = render_abi(&snapshot, Platform::Linux, NumericBase::Hex, FloatView::Double);
        assert_eq!(rows[0].int_value, "0xFFFFFFFFFFFFFFFF");
        assert_eq!(rows[0].float_value, "1.5");

        let rows = render_abi(&snapshot, Platform::Linux, NumericBase::Hex, FloatView::Hex);
        assert_eq!(rows[0].float_value, "0x3FC00000");
    }

    #[test]
    fn float_argument_falls_back_to_ymm() {
        let snapshot = parse_dump("ymm1 {v8_float = {2.5, 0, 0, 0, 0, 0, 0, 0}}");
        let rows = render_abi(&snapshot, Platform::Windows, NumericBase::Hex, FloatView::Float);
        assert_eq!(rows[1].float_value, "2.5");
        assert_eq!(rows[1].float_register, "xmm1");
    }

    #[test]
    fn platform_parsing() {
        assert_eq!("win".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("mac".parse::<Platform>().is_err());
    }
}
