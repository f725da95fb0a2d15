//! SSE and AVX tables.
//!
//! `xmmN` is the low half of `ymmN`. When the requested register has no data
//! in the requested format, the other one stands in and the row is marked as
//! a fallback.

use std::borrow::Cow;

use super::{Cell, Row, Tone};
use crate::core::codec::{NumericBase, ValueType, format_number, get_actual_number, lane_to_bits};
use crate::core::detect::{DetectorConfig, detect_lane_format};
use crate::core::lane::{LaneFormat, LaneSelection, VectorClass};
use crate::core::parser::{RegisterSnapshot, VectorRecord};
use crate::core::register::RegisterInfo;

/// Filler text for lanes the substituted register does not have.
pub const NOT_AVAILABLE: &str = "N/A";

/// Options for rendering one vector table. Built per render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRequest {
    /// Register class of the table.
    pub class: VectorClass,
    /// Lane format, or auto-detection.
    pub format: LaneSelection,
    /// Display base for every lane.
    pub base: NumericBase,
    /// Classify cells by sign and validity.
    pub color: bool,
}

/// Lane format of one register, detecting it from whichever record has data.
fn resolve_format(
    request: &FormatRequest,
    own: Option<&VectorRecord>,
    related: Option<&VectorRecord>,
    config: &DetectorConfig,
) -> Option<LaneFormat> {
    let class = request.class;

    match request.format {
        LaneSelection::Fixed(format) => Some(format.for_class(class)),
        LaneSelection::Auto => {
            let (record, source) = match own.filter(|record| !record.is_empty()) {
                Some(record) => (record, class),
                None => (related?, class.related()),
            };
            Some(detect_lane_format(record, source, config).for_class(class))
        }
    }
}

/// Lanes for `format`, substituting from the related register if needed.
///
/// Returns the lanes and whether they came from the related register.
fn find_lanes<'a>(
    class: VectorClass,
    format: LaneFormat,
    own: Option<&'a VectorRecord>,
    related: Option<&'a VectorRecord>,
) -> Option<(&'a [String], bool)> {
    if let Some(lanes) = own.and_then(|record| record.get(format)) {
        return Some((lanes, false));
    }

    let related = related?;
    match class {
        VectorClass::Avx => {
            let lanes = related.get(format.narrowed()?)?;
            Some((lanes, true))
        }
        VectorClass::Sse => {
            let lanes = related.get(format.widened()?)?;
            Some((&lanes[..lanes.len() / 2], true))
        }
    }
}

/// Lanes backing one row.
#[derive(Debug)]
struct LaneSource<'a> {
    lanes: &'a [String],
    fallback: bool,
    /// Set when float lanes are read from the integer view of the same
    /// lane width; holds that view's type.
    bits_of: Option<ValueType>,
}

impl LaneSource<'_> {
    /// Lane text in a form the codec decodes as the row's format.
    fn text<'s>(&self, lane: &'s str) -> Cow<'s, str> {
        match self.bits_of.map(|int_type| lane_to_bits(lane, int_type)) {
            Some(Ok(bits)) => Cow::Owned(format!("0x{bits:x}")),
            _ => Cow::Borrowed(lane),
        }
    }
}

fn resolve_lanes<'a>(
    class: VectorClass,
    format: LaneFormat,
    own: Option<&'a VectorRecord>,
    related: Option<&'a VectorRecord>,
) -> Option<LaneSource<'a>> {
    if let Some((lanes, fallback)) = find_lanes(class, format, own, related) {
        return Some(LaneSource {
            lanes,
            fallback,
            bits_of: None,
        });
    }

    let int_view = format.bit_view()?;
    let (lanes, fallback) = find_lanes(class, int_view, own, related)?;
    Some(LaneSource {
        lanes,
        fallback,
        bits_of: Some(int_view.value_type()),
    })
}

/// Formats to try for one row, most preferred first.
///
/// Auto mode never drops a register that carries data: it retries with the
/// int32 view and then with any format the register has.
fn candidates(
    request: &FormatRequest,
    detected: LaneFormat,
    own: Option<&VectorRecord>,
) -> Vec<LaneFormat> {
    let mut formats = vec![detected];
    if request.format == LaneSelection::Auto {
        formats.push(request.class.int32_format());
        formats.extend(own.into_iter().flat_map(|record| record.formats()));
    }
    formats
}

fn lane_cell(index: usize, lane: &str, format: LaneFormat, request: &FormatRequest) -> Cell {
    let value_type = format.value_type();

    let (text, tone) = match format_number(lane, value_type, request.base) {
        Ok(text) if request.color => {
            let tone = Tone::of_lane(get_actual_number(lane, value_type), value_type);
            (text, tone)
        }
        Ok(text) => (text, Tone::Plain),
        Err(_) if request.color => (lane.to_string(), Tone::Error),
        Err(_) => (lane.to_string(), Tone::Plain),
    };

    Cell {
        text,
        tone,
        index: Some(index),
    }
}

/// Render the 16 registers of `request.class`.
///
/// Registers with no usable data in either class are omitted.
pub fn render_vector(
    snapshot: &RegisterSnapshot,
    request: &FormatRequest,
    config: &DetectorConfig,
) -> Vec<Row> {
    let class = request.class;

    RegisterInfo::registers_of(class.reg_type())
        .filter_map(|info| {
            let index = info.index?;
            let own = snapshot.vector(info.name);
            let related = snapshot.vector(&class.related().register_name(index));

            let detected = resolve_format(request, own, related, config)?;
            let (format, source) = candidates(request, detected, own)
                .into_iter()
                .find_map(|format| {
                    resolve_lanes(class, format, own, related).map(|source| (format, source))
                })?;

            let mut cells: Vec<Cell> = source
                .lanes
                .iter()
                .enumerate()
                .map(|(i, lane)| lane_cell(i, &source.text(lane), format, request))
                .collect();

            if source.fallback && class == VectorClass::Avx {
                let width = info.size * 8 / format.value_type().bits() as usize;
                let missing = width.saturating_sub(cells.len());
                cells.extend((0..missing).map(|_| Cell {
                    text: NOT_AVAILABLE.to_string(),
                    tone: Tone::Unavailable,
                    index: None,
                }));
            }

            Some(Row {
                label: info.name.to_string(),
                cells,
                fallback: source.fallback,
                format: Some(format),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_dump;

    fn request(class: VectorClass, format: LaneSelection) -> FormatRequest {
        FormatRequest {
            class,
            format,
            base: NumericBase::Dec,
            color: true,
        }
    }

    fn texts(row: &Row) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn fixed_format_on_own_register() {
        let snapshot = parse_dump("xmm0 {v4_float = {1.5, -2.25, 0, nan(0x400000)}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Float)),
            &DetectorConfig::default(),
        );

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].fallback);
        assert_eq!(texts(&rows[0]), ["1.5", "-2.25", "0", "nan(0x400000)"]);
        let tones: Vec<_> = rows[0].cells.iter().map(|c| c.tone).collect();
        assert_eq!(tones, [Tone::Float, Tone::Float, Tone::Float, Tone::Error]);
    }

    #[test]
    fn hex_base_converts_decimal_lanes() {
        let snapshot = parse_dump("xmm1 {v4_float = {1, 0, 0, 0}}");
        let mut req = request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Float));
        req.base = NumericBase::Hex;
        let rows = render_vector(&snapshot, &req, &DetectorConfig::default());
        assert_eq!(rows[0].cells[0].text, "0x3F800000");
    }

    #[test]
    fn ymm_from_xmm_is_padded() {
        let snapshot = parse_dump("xmm2 {v4_float = {1, 2, 3, 4}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Avx, LaneSelection::Fixed(LaneFormat::V8Float)),
            &DetectorConfig::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "ymm2");
        assert!(rows[0].fallback);
        assert_eq!(texts(&rows[0]), ["1", "2", "3", "4", "N/A", "N/A", "N/A", "N/A"]);
        assert_eq!(rows[0].cells[4].tone, Tone::Unavailable);
    }

    #[test]
    fn xmm_from_ymm_takes_low_half() {
        let snapshot = parse_dump("ymm3 {v8_int32 = {0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0xffffffff}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Int32)),
            &DetectorConfig::default(),
        );

        assert_eq!(rows[0].label, "xmm3");
        assert!(rows[0].fallback);
        assert_eq!(texts(&rows[0]), ["1", "2", "3", "4"]);
    }

    #[test]
    fn format_is_adjusted_to_table_width() {
        let snapshot = parse_dump("ymm4 {v4_double = {1, 2, 3, 4}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Avx, LaneSelection::Fixed(LaneFormat::V2Double)),
            &DetectorConfig::default(),
        );
        assert_eq!(rows[0].format, Some(LaneFormat::V4Double));
        assert_eq!(rows[0].cells.len(), 4);
    }

    #[test]
    fn auto_detects_float_lanes() {
        let snapshot = parse_dump(
            "xmm5 {v4_float = {0x3f800000, 0x0, 0x0, 0x0}, v4_int32 = {0x3f800000, 0x0, 0x0, 0x0}}",
        );
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );
        assert_eq!(rows[0].format, Some(LaneFormat::V4Float));
        assert_eq!(rows[0].cells[0].text, "1");
    }

    #[test]
    fn auto_detects_integer_lanes() {
        let snapshot = parse_dump(
            "xmm6 {v4_float = {0x1, 0x2, 0x3, 0x4}, v4_int32 = {0x1, 0x2, 0x3, 0x4}}",
        );
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );
        assert_eq!(rows[0].format, Some(LaneFormat::V4Int32));
        assert_eq!(texts(&rows[0]), ["1", "2", "3", "4"]);
    }

    #[test]
    fn auto_uses_related_register_when_own_is_missing() {
        let snapshot = parse_dump(
            "ymm7 {v8_float = {1, 0, 0, 0, 0, 0, 0, 0}, v8_int32 = {0x3f800000, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0}}",
        );
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );
        assert_eq!(rows[0].label, "xmm7");
        assert_eq!(rows[0].format, Some(LaneFormat::V4Float));
        assert!(rows[0].fallback);
        assert_eq!(rows[0].cells.len(), 4);
    }

    #[test]
    fn integer_lanes_are_toned_by_sign() {
        let snapshot = parse_dump("xmm9 {v4_int32 = {0x1, 0xffffffff, 0x0, 0x7}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Int32)),
            &DetectorConfig::default(),
        );
        let tones: Vec<_> = rows[0].cells.iter().map(|c| c.tone).collect();
        assert_eq!(tones, [Tone::Positive, Tone::Negative, Tone::Plain, Tone::Positive]);
    }

    #[test]
    fn undecodable_lane_is_plain_without_colour() {
        let snapshot = parse_dump("xmm10 {v4_int32 = {0x1, 0xzz, 0x0, 0x0}}");
        let mut req = request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Int32));

        req.color = false;
        let rows = render_vector(&snapshot, &req, &DetectorConfig::default());
        assert_eq!(rows[0].cells[1].text, "0xzz");
        assert!(rows[0].cells.iter().all(|c| c.tone == Tone::Plain));

        req.color = true;
        let rows = render_vector(&snapshot, &req, &DetectorConfig::default());
        assert_eq!(rows[0].cells[1].tone, Tone::Error);
    }

    #[test]
    fn auto_float_is_read_from_int32_bits() {
        let snapshot = parse_dump("xmm0 {v4_int32 = {0x3F800000, 0x0, 0x0, 0x0}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].format, Some(LaneFormat::V4Float));
        assert!(!rows[0].fallback);
        assert_eq!(texts(&rows[0]), ["1", "0", "0", "0"]);
        assert_eq!(rows[0].cells[0].tone, Tone::Float);
    }

    #[test]
    fn auto_float_from_decimal_int32_lanes() {
        let snapshot = parse_dump("xmm11 {v4_int32 = {1065353216, 1065353216, 0, 0}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );
        assert_eq!(rows[0].format, Some(LaneFormat::V4Float));
        assert_eq!(texts(&rows[0]), ["1", "1", "0", "0"]);
    }

    #[test]
    fn auto_keeps_registers_with_other_formats() {
        let snapshot = parse_dump("xmm12 {v16_int8 = {0x1, 0x0 <repeats 15 times>}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Auto),
            &DetectorConfig::default(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].format, Some(LaneFormat::V16Int8));
        assert_eq!(rows[0].cells.len(), 16);
    }

    #[test]
    fn registers_without_data_are_omitted() {
        let snapshot = parse_dump("xmm8 {v16_int8 = {0x0 <repeats 16 times>}}");
        let rows = render_vector(
            &snapshot,
            &request(VectorClass::Sse, LaneSelection::Fixed(LaneFormat::V4Float)),
            &DetectorConfig::default(),
        );
        assert!(rows.is_empty());
    }
}
