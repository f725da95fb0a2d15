//! Lane-format tags naming the ways GDB slices a vector register.

use std::fmt;
use std::str::FromStr;

use crate::core::codec::ValueType;
use crate::core::register::RegisterType;
use crate::{Error, Result};

/// Vector register file a lane format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorClass {
    /// 128-bit `xmm` registers.
    Sse,
    /// 256-bit `ymm` registers.
    Avx,
}

impl VectorClass {
    /// Register name prefix (`xmm` or `ymm`).
    pub fn prefix(self) -> &'static str {
        match self {
            VectorClass::Sse => "xmm",
            VectorClass::Avx => "ymm",
        }
    }

    /// The other vector class, sharing its low 128 bits with this one.
    pub fn related(self) -> Self {
        match self {
            VectorClass::Sse => VectorClass::Avx,
            VectorClass::Avx => VectorClass::Sse,
        }
    }

    /// Catalogue type of registers in this class.
    pub fn reg_type(self) -> RegisterType {
        match self {
            VectorClass::Sse => RegisterType::Sse,
            VectorClass::Avx => RegisterType::Avx,
        }
    }

    /// Name of register number `index` in this class.
    pub fn register_name(self, index: usize) -> String {
        format!("{}{index}", self.prefix())
    }

    /// 32-bit integer view, sampled by auto-detection.
    pub fn int32_format(self) -> LaneFormat {
        match self {
            VectorClass::Sse => LaneFormat::V4Int32,
            VectorClass::Avx => LaneFormat::V8Int32,
        }
    }

    /// 32-bit float view, chosen when auto-detection finds float data.
    pub fn float_format(self) -> LaneFormat {
        match self {
            VectorClass::Sse => LaneFormat::V4Float,
            VectorClass::Avx => LaneFormat::V8Float,
        }
    }
}

/// Element count times element type interpretation of a vector register.
///
/// The tag strings (`v4_float`, `v8_int32`, ...) are the ones GDB prints and
/// are kept stable for anything keying off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaneFormat {
    /// `v4_int32`
    V4Int32,
    /// `v8_int32`
    V8Int32,
    /// `v4_float`
    V4Float,
    /// `v8_float`
    V8Float,
    /// `v2_double`
    V2Double,
    /// `v4_double`
    V4Double,
    /// `v16_int8`
    V16Int8,
    /// `v32_int8`
    V32Int8,
    /// `v8_int16`
    V8Int16,
    /// `v16_int16`
    V16Int16,
    /// `v2_int64`
    V2Int64,
    /// `v4_int64`
    V4Int64,
}

impl LaneFormat {
    /// Number of lane formats.
    pub const COUNT: usize = 12;

    /// Every lane format, in declaration order.
    pub const ALL: [LaneFormat; LaneFormat::COUNT] = [
        LaneFormat::V4Int32,
        LaneFormat::V8Int32,
        LaneFormat::V4Float,
        LaneFormat::V8Float,
        LaneFormat::V2Double,
        LaneFormat::V4Double,
        LaneFormat::V16Int8,
        LaneFormat::V32Int8,
        LaneFormat::V8Int16,
        LaneFormat::V16Int16,
        LaneFormat::V2Int64,
        LaneFormat::V4Int64,
    ];

    /// Tag string as printed by GDB.
    pub fn tag(self) -> &'static str {
        match self {
            LaneFormat::V4Int32 => "v4_int32",
            LaneFormat::V8Int32 => "v8_int32",
            LaneFormat::V4Float => "v4_float",
            LaneFormat::V8Float => "v8_float",
            LaneFormat::V2Double => "v2_double",
            LaneFormat::V4Double => "v4_double",
            LaneFormat::V16Int8 => "v16_int8",
            LaneFormat::V32Int8 => "v32_int8",
            LaneFormat::V8Int16 => "v8_int16",
            LaneFormat::V16Int16 => "v16_int16",
            LaneFormat::V2Int64 => "v2_int64",
            LaneFormat::V4Int64 => "v4_int64",
        }
    }

    /// Look up a lane format by its tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.tag() == tag)
    }

    /// Slot of this format within per-register storage.
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Number of lanes.
    pub fn lanes(self) -> usize {
        let register_bits = match self.class() {
            VectorClass::Sse => 128,
            VectorClass::Avx => 256,
        };
        register_bits / self.value_type().bits() as usize
    }

    /// Interpretation of each lane.
    pub fn value_type(self) -> ValueType {
        match self {
            LaneFormat::V4Float | LaneFormat::V8Float => ValueType::Float,
            LaneFormat::V2Double | LaneFormat::V4Double => ValueType::Double,
            LaneFormat::V16Int8 | LaneFormat::V32Int8 => ValueType::Int(8),
            LaneFormat::V8Int16 | LaneFormat::V16Int16 => ValueType::Int(16),
            LaneFormat::V4Int32 | LaneFormat::V8Int32 => ValueType::Int(32),
            LaneFormat::V2Int64 | LaneFormat::V4Int64 => ValueType::Int(64),
        }
    }

    /// Register class whose width this format covers.
    pub fn class(self) -> VectorClass {
        match self {
            LaneFormat::V4Int32
            | LaneFormat::V4Float
            | LaneFormat::V2Double
            | LaneFormat::V16Int8
            | LaneFormat::V8Int16
            | LaneFormat::V2Int64 => VectorClass::Sse,
            _ => VectorClass::Avx,
        }
    }

    /// The 256-bit format with the same element type.
    pub fn widened(self) -> Option<Self> {
        match self {
            LaneFormat::V4Int32 => Some(LaneFormat::V8Int32),
            LaneFormat::V4Float => Some(LaneFormat::V8Float),
            LaneFormat::V2Double => Some(LaneFormat::V4Double),
            LaneFormat::V16Int8 => Some(LaneFormat::V32Int8),
            LaneFormat::V8Int16 => Some(LaneFormat::V16Int16),
            LaneFormat::V2Int64 => Some(LaneFormat::V4Int64),
            _ => None,
        }
    }

    /// The 128-bit format with the same element type.
    pub fn narrowed(self) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.widened() == Some(self))
    }

    /// Integer format with the same lane width, for reading float lanes
    /// from their raw bits. `None` for integer formats.
    pub fn bit_view(self) -> Option<Self> {
        match self {
            LaneFormat::V4Float => Some(LaneFormat::V4Int32),
            LaneFormat::V8Float => Some(LaneFormat::V8Int32),
            LaneFormat::V2Double => Some(LaneFormat::V2Int64),
            LaneFormat::V4Double => Some(LaneFormat::V4Int64),
            _ => None,
        }
    }

    /// Same element type at the width of `class`.
    pub fn for_class(self, class: VectorClass) -> Self {
        if self.class() == class {
            return self;
        }
        match class {
            VectorClass::Sse => self.narrowed(),
            VectorClass::Avx => self.widened(),
        }
        .unwrap_or(self)
    }
}

impl FromStr for LaneFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| Error::InvalidOption {
            option: "lane format",
            value: s.to_string(),
        })
    }
}

impl fmt::Display for LaneFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Lane format requested for a vector table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSelection {
    /// Pick integer or float lanes per register from its bit patterns.
    Auto,
    /// Always use the given format.
    Fixed(LaneFormat),
}

impl FromStr for LaneSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(LaneSelection::Auto),
            tag => tag.parse().map(LaneSelection::Fixed),
        }
    }
}
