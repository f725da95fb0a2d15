//! Line-oriented parser for GDB `info all-registers` output.
//!
//! Each line is tried against an ordered list of matchers, first match wins:
//!
//! - general-purpose scalars: `rax 0x1 1`
//! - derived scalars: `eflags 0x246 [ IF ZF PF ]`, `rip 0x401136 0x401136 <main+4>`
//! - x87 stack registers: `st0 1.5 (raw 0x3fffc000000000000000)`
//! - vector registers: `xmm0 {v4_float = {...}, v4_int32 = {...}}`
//!
//! Anything else is skipped. A missing register is a normal state.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::core::codec::{ValueType, lane_to_bits};
use crate::core::lane::LaneFormat;
use crate::core::register::{FCTRL, FSTAT, RegisterInfo, RegisterType};

/// Upper bound on a single `<repeats N times>` expansion.
const MAX_REPEATS: usize = 256;

/// Value of a general-purpose, segment, or control register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRecord {
    /// `0x`-prefixed lowercase hexadecimal value.
    pub hex: String,
    /// Base-10 value as printed by GDB, or derived from `hex` when GDB prints
    /// flags or a pointer instead.
    pub decimal: String,
    /// Flag names from a bracketed flag list (`[ IF ZF ]`); empty otherwise.
    pub flags: Vec<String>,
}

/// Value of an x87 stack register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedRecord {
    /// GDB's own rendering of the 80-bit value.
    pub display_value: String,
    /// Raw bit pattern as reported.
    pub raw_hex: String,
}

/// Value of an MMX register, derived from the low 64 bits of its `st` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmxRecord {
    /// Exactly 16 hex digits, no prefix.
    pub hex: String,
}

/// Lane sequences of a vector register, one slot per [`LaneFormat`].
///
/// A format GDB did not print is `None`, which is distinct from an empty
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorRecord {
    lanes: [Option<Vec<String>>; LaneFormat::COUNT],
}

impl VectorRecord {
    /// Lanes under `format`, if GDB printed them.
    pub fn get(&self, format: LaneFormat) -> Option<&[String]> {
        self.lanes[format.slot()].as_deref()
    }

    /// Store the lanes for `format`, replacing any previous ones.
    pub fn set(&mut self, format: LaneFormat, lanes: Vec<String>) {
        self.lanes[format.slot()] = Some(lanes);
    }

    /// Formats present on this register.
    pub fn formats(&self) -> impl Iterator<Item = LaneFormat> + '_ {
        LaneFormat::ALL
            .into_iter()
            .filter(|format| self.lanes[format.slot()].is_some())
    }

    /// Returns `true` if no format is present.
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Option::is_none)
    }
}

/// Raw x87 status and control words; decoded only when rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusWord {
    /// `fstat`, if present in the dump.
    pub fstat: Option<u16>,
    /// `fctrl`, if present in the dump.
    pub fctrl: Option<u16>,
}

/// Parsed value of a single register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterRecord {
    /// General-purpose or control register.
    Scalar(ScalarRecord),
    /// x87 stack register.
    Extended(ExtendedRecord),
    /// MMX register.
    Mmx(MmxRecord),
    /// SSE or AVX register.
    Vector(VectorRecord),
}

/// Every register recognized in one dump, keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterSnapshot {
    registers: HashMap<String, RegisterRecord>,
    status: StatusWord,
}

impl RegisterSnapshot {
    /// Record for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&RegisterRecord> {
        self.registers.get(&name.to_ascii_lowercase())
    }

    /// Scalar record for `name`, if that register is a scalar.
    pub fn scalar(&self, name: &str) -> Option<&ScalarRecord> {
        match self.get(name)? {
            RegisterRecord::Scalar(record) => Some(record),
            _ => None,
        }
    }

    /// x87 record for `name`, if that register is an x87 stack register.
    pub fn extended(&self, name: &str) -> Option<&ExtendedRecord> {
        match self.get(name)? {
            RegisterRecord::Extended(record) => Some(record),
            _ => None,
        }
    }

    /// MMX record for `name`.
    pub fn mmx(&self, name: &str) -> Option<&MmxRecord> {
        match self.get(name)? {
            RegisterRecord::Mmx(record) => Some(record),
            _ => None,
        }
    }

    /// Vector record for `name`.
    pub fn vector(&self, name: &str) -> Option<&VectorRecord> {
        match self.get(name)? {
            RegisterRecord::Vector(record) => Some(record),
            _ => None,
        }
    }

    /// x87 status and control words.
    pub fn status(&self) -> StatusWord {
        self.status
    }

    /// Names of all registers present, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.registers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registers present.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Returns `true` if no register was recognized.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    fn apply(&mut self, found: LineMatch) {
        match found {
            LineMatch::Scalar { name, record } => {
                let word = || lane_to_bits(&record.hex, ValueType::Int(64)).ok();
                if name == FSTAT {
                    self.status.fstat = word().map(|bits| bits as u16);
                } else if name == FCTRL {
                    self.status.fctrl = word().map(|bits| bits as u16);
                }
                self.registers.insert(name, RegisterRecord::Scalar(record));
            }
            LineMatch::Extended { name, record } => {
                // mmN aliases the low 64 bits of stN.
                let alias = RegisterInfo::register_info_by_name(&name)
                    .and_then(|st| st.index)
                    .and_then(|index| RegisterInfo::register_info_by_index(RegisterType::Mmx, index));
                if let Some(mm) = alias {
                    let mmx = MmxRecord {
                        hex: mmx_from_raw(&record.raw_hex),
                    };
                    self.registers
                        .insert(mm.name.to_string(), RegisterRecord::Mmx(mmx));
                }
                self.registers.insert(name, RegisterRecord::Extended(record));
            }
            LineMatch::Vector { name, record } => {
                self.registers.insert(name, RegisterRecord::Vector(record));
            }
        }
    }
}

/// Structured result of a single matcher.
#[derive(Debug)]
enum LineMatch {
    Scalar { name: String, record: ScalarRecord },
    Extended { name: String, record: ExtendedRecord },
    Vector { name: String, record: VectorRecord },
}

type Matcher = fn(&str) -> Option<LineMatch>;

// Priority order matters: some lines could match more than one pattern.
const MATCHERS: &[Matcher] = &[
    match_general_purpose,
    match_derived_scalar,
    match_x87,
    match_vector,
];

/// Compiled regex patterns for register lines.
struct Patterns {
    /// Matches `rax 0x1c 28`, `fctrl 0x37f 895`.
    general_purpose: Regex,
    /// Matches `eflags 0x246 [ IF ZF PF ]` and `rip 0x401136 0x401136 <main+4>`.
    derived_scalar: Regex,
    /// Matches `st0 1.5 (raw 0x3fffc000000000000000)`.
    x87: Regex,
    /// Matches `v4_float = {1, 2, 3, 4}` groups inside a vector line.
    lane_group: Regex,
    /// Matches GDB repeat compression: `0x0 <repeats 16 times>`.
    repeats: Regex,
    /// A bare register name.
    register_name: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    general_purpose: Regex::new(r"(?i)^(\w{2,5})\s+(0x[0-9a-f]+)\s+(-?\d+)(?:\s|$)").unwrap(),
    derived_scalar: Regex::new(r"(?i)^(\w+)\s+(0x[0-9a-f]+)\s+(?:\[([^\]]*)\]|0x[0-9a-f]+)").unwrap(),
    x87: Regex::new(r"(?i)^(st\d)\s+(.*?)\s*\(raw\s+(0x[0-9a-f]+)\)").unwrap(),
    lane_group: Regex::new(r"\b(v\d+_[a-z]+\d*)\s*=\s*\{([^}]*)\}").unwrap(),
    repeats: Regex::new(r"^(.*?)\s*<repeats\s+(\d+)\s+times>$").unwrap(),
    register_name: Regex::new(r"^\w+$").unwrap(),
});

fn match_general_purpose(line: &str) -> Option<LineMatch> {
    let caps = PATTERNS.general_purpose.captures(line)?;

    Some(LineMatch::Scalar {
        name: caps[1].to_ascii_lowercase(),
        record: ScalarRecord {
            hex: caps[2].to_ascii_lowercase(),
            decimal: caps[3].to_string(),
            flags: Vec::new(),
        },
    })
}

fn match_derived_scalar(line: &str) -> Option<LineMatch> {
    let caps = PATTERNS.derived_scalar.captures(line)?;
    let hex = caps[2].to_ascii_lowercase();
    let decimal = lane_to_bits(&hex, ValueType::Int(64)).ok()?.to_string();

    Some(LineMatch::Scalar {
        name: caps[1].to_ascii_lowercase(),
        record: ScalarRecord {
            hex,
            decimal,
            flags: caps
                .get(3)
                .map(|flags| flags.as_str().split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        },
    })
}

fn match_x87(line: &str) -> Option<LineMatch> {
    let caps = PATTERNS.x87.captures(line)?;

    Some(LineMatch::Extended {
        name: caps[1].to_ascii_lowercase(),
        record: ExtendedRecord {
            display_value: caps[2].trim().to_string(),
            raw_hex: caps[3].to_ascii_lowercase(),
        },
    })
}

fn match_vector(line: &str) -> Option<LineMatch> {
    let brace = line.find('{')?;

    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    // `$1 = ...` style lines carry the register name in the third token.
    let name = if first.starts_with('$') {
        tokens.nth(1)?
    } else {
        first
    };

    if !PATTERNS.register_name.is_match(name) {
        debug!("vector line without a register name: {line}");
        return None;
    }

    let mut record = VectorRecord::default();
    for caps in PATTERNS.lane_group.captures_iter(&line[brace..]) {
        if let Some(format) = LaneFormat::from_tag(&caps[1]) {
            record.set(format, split_lanes(&caps[2]));
        }
    }

    Some(LineMatch::Vector {
        name: name.to_ascii_lowercase(),
        record,
    })
}

/// Split a `{...}` blob into trimmed lane strings, expanding `<repeats N times>`.
fn split_lanes(blob: &str) -> Vec<String> {
    if blob.trim().is_empty() {
        return Vec::new();
    }

    let mut lanes = Vec::new();
    for item in blob.split(',').map(str::trim) {
        match PATTERNS.repeats.captures(item) {
            Some(caps) => {
                let requested = caps[2].parse::<usize>().unwrap_or(1);
                if requested > MAX_REPEATS {
                    warn!("clamping '<repeats {requested} times>' to {MAX_REPEATS} lanes");
                }
                let count = requested.min(MAX_REPEATS);
                lanes.extend(std::iter::repeat_n(caps[1].to_string(), count));
            }
            None => lanes.push(item.to_string()),
        }
    }
    lanes
}

/// Low 64 bits of an x87 raw value as 16 zero-padded hex digits.
fn mmx_from_raw(raw_hex: &str) -> String {
    let digits = raw_hex.trim_start_matches("0x");
    let low = &digits[digits.len().saturating_sub(16)..];
    format!("{low:0>16}")
}

/// Parse a full register dump into a [`RegisterSnapshot`].
///
/// Lines are separated by real newlines or by literal `\n` escapes. Blank
/// lines, `info ...` echoes, and `---` section markers are skipped.
pub fn parse_dump(raw: &str) -> RegisterSnapshot {
    let mut snapshot = RegisterSnapshot::default();

    for line in raw.split('\n').flat_map(|line| line.split("\\n")) {
        let line = line.trim();
        if line.is_empty() || line.starts_with("info") || line.starts_with("---") {
            continue;
        }

        match MATCHERS.iter().find_map(|matcher| matcher(line)) {
            Some(found) => snapshot.apply(found),
            None => debug!("skipping unrecognized line: {line}"),
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_purpose_line() {
        let snapshot = parse_dump("rax            0x1               1");
        let rax = snapshot.scalar("rax").unwrap();
        assert_eq!(rax.hex, "0x1");
        assert_eq!(rax.decimal, "1");
        assert!(rax.flags.is_empty());
    }

    #[test]
    fn names_and_hex_are_lowercased() {
        let snapshot = parse_dump("RBX 0xDEAD -1");
        assert_eq!(snapshot.scalar("rbx").unwrap().hex, "0xdead");
        assert!(snapshot.scalar("RBX").is_some());
    }

    #[test]
    fn negative_decimal_column() {
        let snapshot = parse_dump("rcx 0xffffffffffffffff -1");
        assert_eq!(snapshot.scalar("rcx").unwrap().decimal, "-1");
    }

    #[test]
    fn flag_list_line_derives_decimal() {
        let snapshot = parse_dump("eflags         0x246               [ IF ZF PF ]");
        let eflags = snapshot.scalar("eflags").unwrap();
        assert_eq!(eflags.decimal, "582");
        assert_eq!(eflags.flags, ["IF", "ZF", "PF"]);
    }

    #[test]
    fn pointer_line_derives_decimal() {
        let snapshot = parse_dump("rip            0x401136            0x401136 <main+4>");
        let rip = snapshot.scalar("rip").unwrap();
        assert_eq!(rip.hex, "0x401136");
        assert_eq!(rip.decimal, "4198710");
    }

    #[test]
    fn status_words_are_captured() {
        let snapshot = parse_dump("fctrl          0x37f               895\nfstat          0x4020              16416");
        assert_eq!(snapshot.status().fctrl, Some(0x37f));
        assert_eq!(snapshot.status().fstat, Some(0x4020));
        assert!(snapshot.scalar("fctrl").is_some());
    }

    #[test]
    fn x87_line_derives_mmx() {
        let snapshot =
            parse_dump("st0            1.5                 (raw 0x3fffc000000000000000)");
        let st0 = snapshot.extended("st0").unwrap();
        assert_eq!(st0.display_value, "1.5");
        assert_eq!(st0.raw_hex, "0x3fffc000000000000000");
        assert_eq!(snapshot.mmx("mm0").unwrap().hex, "c000000000000000");
    }

    #[test]
    fn short_raw_value_is_padded() {
        assert_eq!(mmx_from_raw("0x1f"), "000000000000001f");
        assert_eq!(mmx_from_raw("0x0"), "0000000000000000");
    }

    #[test]
    fn vector_line() {
        let snapshot = parse_dump(
            "xmm0           {v4_float = {1.5, -2.25, 0, 0}, v2_double = {0x0, 0x0}, uint128 = 0x0}",
        );
        let xmm0 = snapshot.vector("xmm0").unwrap();
        assert_eq!(xmm0.get(LaneFormat::V4Float).unwrap(), ["1.5", "-2.25", "0", "0"]);
        assert_eq!(xmm0.get(LaneFormat::V2Double).unwrap().len(), 2);
        assert!(xmm0.get(LaneFormat::V4Int32).is_none());
        assert_eq!(
            xmm0.formats().collect::<Vec<_>>(),
            [LaneFormat::V4Float, LaneFormat::V2Double]
        );
    }

    #[test]
    fn unknown_lane_tags_are_ignored() {
        let snapshot = parse_dump("xmm1 {v8_bfloat16 = {0x0, 0x0}, v8_half = {0x0, 0x0}}");
        assert!(snapshot.vector("xmm1").unwrap().is_empty());
    }

    #[test]
    fn empty_blob_is_an_empty_sequence() {
        let snapshot = parse_dump("xmm2 {v4_int32 = {}}");
        assert_eq!(snapshot.vector("xmm2").unwrap().get(LaneFormat::V4Int32), Some(&[][..]));
    }

    #[test]
    fn repeats_are_expanded() {
        let snapshot = parse_dump("xmm3 {v16_int8 = {0x1, 0x0 <repeats 15 times>}}");
        let lanes = snapshot.vector("xmm3").unwrap().get(LaneFormat::V16Int8).unwrap();
        assert_eq!(lanes.len(), 16);
        assert_eq!(lanes[0], "0x1");
        assert!(lanes[1..].iter().all(|lane| lane == "0x0"));
    }

    #[test]
    fn oversized_repeat_is_clamped() {
        let snapshot = parse_dump("ymm0 {v32_int8 = {0x0 <repeats 100000 times>}}");
        let lanes = snapshot.vector("ymm0").unwrap().get(LaneFormat::V32Int8).unwrap();
        assert_eq!(lanes.len(), MAX_REPEATS);
    }

    #[test]
    fn dollar_prefixed_line_uses_third_token() {
        let snapshot = parse_dump("$1 = ymm4 {v8_float = {1, 2, 3, 4, 5, 6, 7, 8}}");
        assert_eq!(
            snapshot.vector("ymm4").unwrap().get(LaneFormat::V8Float).unwrap().len(),
            8
        );
    }

    #[test]
    fn dollar_line_without_name_is_skipped() {
        let snapshot = parse_dump("$1 = {v8_float = {1, 2, 3, 4, 5, 6, 7, 8}}");
        assert!(snapshot.is_empty());
    }

    #[test]
    fn escaped_newlines_split_lines() {
        let snapshot = parse_dump(r"rax 0x1 1\nrbx 0x2 2");
        assert_eq!(snapshot.names(), ["rax", "rbx"]);
    }

    #[test]
    fn markers_and_noise_are_skipped() {
        let raw = "info all-registers\n--- FORCED YMM FETCH ---\n\nThe history is empty.\nfs_base <unavailable>";
        let snapshot = parse_dump(raw);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn later_line_replaces_earlier_record() {
        let snapshot = parse_dump("ymm0 {v8_int32 = {0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0}}\nymm0 {v8_float = {1, 0, 0, 0, 0, 0, 0, 0}}");
        let ymm0 = snapshot.vector("ymm0").unwrap();
        assert!(ymm0.get(LaneFormat::V8Int32).is_none());
        assert!(ymm0.get(LaneFormat::V8Float).is_some());
    }
}
