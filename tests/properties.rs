//! Property-based tests using proptest.

use proptest::prelude::*;

use regview::core::codec::{
    double_to_hex, float_to_hex, hex_to_float32, hex_to_float64, hex_to_signed_int,
};
use regview::core::detect::{NumberType, detect_number_type};
use regview::parse_dump;

const DUMP: &str = include_str!("fixtures/info_all_registers.txt");

// ── Strategies ──────────────────────────────────────────────────────────

/// A bit width and an unsigned value that fits in it.
fn width_and_value() -> impl Strategy<Value = (u32, u64)> {
    prop::sample::select(vec![8u32, 16, 32, 64]).prop_flat_map(|width| {
        let max = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        (Just(width), 0..=max)
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn float32_round_trips(bits in any::<u32>()) {
        let hex = format!("0x{bits:08X}");
        prop_assert_eq!(float_to_hex(hex_to_float32(&hex).unwrap()), hex);
    }

    #[test]
    fn float64_round_trips(bits in any::<u64>()) {
        let hex = format!("0x{bits:016X}");
        prop_assert_eq!(double_to_hex(hex_to_float64(&hex).unwrap()), hex);
    }

    #[test]
    fn signed_int_adjustment((width, value) in width_and_value()) {
        let signed = hex_to_signed_int(&format!("0x{value:x}"), width).unwrap();
        let expected = if width == 64 {
            value as i64
        } else if value < 1u64 << (width - 1) {
            value as i64
        } else {
            value as i64 - (1i64 << width)
        };
        prop_assert_eq!(signed, expected);
    }

    #[test]
    fn detector_is_total_and_stable(bits in any::<u32>(), force_double in any::<bool>()) {
        let hex = format!("0x{bits:08x}");
        let first = detect_number_type(&hex, force_double).unwrap();
        prop_assert_eq!(detect_number_type(&hex, force_double).unwrap(), first);
        prop_assert_eq!(first == NumberType::Zero, bits == 0);
    }

    #[test]
    fn line_order_does_not_matter(
        lines in Just(DUMP.lines().collect::<Vec<_>>()).prop_shuffle()
    ) {
        prop_assert_eq!(parse_dump(&lines.join("\n")), parse_dump(DUMP));
    }
}
