//! Turns a [`RegisterSnapshot`](crate::RegisterSnapshot) into display rows,
//! one table per register class.

mod abi;
mod gp;
mod mmx;
mod simd;
mod x87;

pub use abi::{AbiRow, AbiSlot, FloatView, PLACEHOLDER, Platform, render_abi};
pub use gp::{GpFormat, render_gp};
pub use mmx::{MmxFormat, render_mmx};
pub use simd::{FormatRequest, NOT_AVAILABLE, render_vector};
pub use x87::{CONTROL_FLAGS, FlagState, STATUS_FLAGS, X87Table, decode_flags, render_x87};

use crate::core::codec::ValueType;
use crate::core::lane::LaneFormat;

/// Colour class of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// No colouring (colour disabled, or a zero value).
    #[default]
    Plain,
    /// Value greater than zero.
    Positive,
    /// Value less than zero.
    Negative,
    /// Finite value of a floating-point lane.
    Float,
    /// NaN, infinite, or undecodable value.
    Error,
    /// Filler for lanes the source register does not have.
    Unavailable,
}

impl Tone {
    /// Tone of a decoded vector lane. Finite floating-point lanes are
    /// [`Tone::Float`]; everything else is classified by [`Tone::of`].
    pub fn of_lane(value: f64, value_type: ValueType) -> Self {
        if value.is_finite() && value_type.is_floating() {
            Tone::Float
        } else {
            Tone::of(value)
        }
    }

    /// Tone of a decoded numeric value.
    pub fn of(value: f64) -> Self {
        if !value.is_finite() {
            Tone::Error
        } else if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Plain
        }
    }
}

/// A single formatted value.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Display text.
    pub text: String,
    /// Colour class.
    pub tone: Tone,
    /// Lane index, for cells that are vector or MMX lanes.
    pub index: Option<usize>,
}

impl Cell {
    /// Plain cell without a lane index.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
            index: None,
        }
    }
}

/// One register's row in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Register name.
    pub label: String,
    /// Formatted values.
    pub cells: Vec<Cell>,
    /// Data was substituted from a related register.
    pub fallback: bool,
    /// Lane format the cells were decoded with, for vector rows.
    pub format: Option<LaneFormat>,
}

impl Row {
    pub(crate) fn new(label: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            label: label.into(),
            cells,
            fallback: false,
            format: None,
        }
    }
}
