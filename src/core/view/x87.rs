use super::{Cell, Row};
use crate::core::parser::RegisterSnapshot;
use crate::core::register::{RegisterInfo, RegisterType};

/// Status word flags and their bit positions.
pub const STATUS_FLAGS: &[(&str, u8)] = &[
    ("B", 15),
    ("C3", 14),
    ("C2", 10),
    ("C1", 9),
    ("C0", 8),
    ("IR", 7),
    ("PE", 5),
    ("UE", 4),
    ("OE", 3),
    ("ZE", 2),
    ("DE", 1),
    ("IE", 0),
];

/// Control word flags and their bit positions.
pub const CONTROL_FLAGS: &[(&str, u8)] = &[
    ("PC", 10),
    ("RC", 8),
    ("PM", 5),
    ("UM", 4),
    ("OM", 3),
    ("ZM", 2),
    ("DM", 1),
    ("IM", 0),
];

/// A single decoded flag bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagState {
    /// Flag mnemonic.
    pub name: &'static str,
    /// Whether the bit is set.
    pub on: bool,
}

impl FlagState {
    /// `"on"` or `"off"`.
    pub fn state(&self) -> &'static str {
        if self.on { "on" } else { "off" }
    }
}

/// Decode `word` bit by bit against a flag table.
pub fn decode_flags(word: u16, table: &[(&'static str, u8)]) -> Vec<FlagState> {
    table
        .iter()
        .map(|&(name, bit)| FlagState {
            name,
            on: word & (1 << bit) != 0,
        })
        .collect()
}

/// Rendered x87 registers and decoded status/control words.
#[derive(Debug, Clone, PartialEq)]
pub struct X87Table {
    /// `stN` rows: display value, then raw hex.
    pub rows: Vec<Row>,
    /// Decoded `fstat`; empty if the dump had none.
    pub status: Vec<FlagState>,
    /// Decoded `fctrl`; empty if the dump had none.
    pub control: Vec<FlagState>,
}

/// Render the x87 stack and its status/control words.
pub fn render_x87(snapshot: &RegisterSnapshot) -> X87Table {
    let rows = RegisterInfo::registers_of(RegisterType::X87)
        .filter_map(|info| {
            let record = snapshot.extended(info.name)?;
            Some(Row::new(
                info.name,
                vec![
                    Cell::plain(record.display_value.as_str()),
                    Cell::plain(record.raw_hex.as_str()),
                ],
            ))
        })
        .collect();

    let words = snapshot.status();

    X87Table {
        rows,
        status: words
            .fstat
            .map(|word| decode_flags(word, STATUS_FLAGS))
            .unwrap_or_default(),
        control: words
            .fctrl
            .map(|word| decode_flags(word, CONTROL_FLAGS))
            .unwrap_or_default(),
    }
}
