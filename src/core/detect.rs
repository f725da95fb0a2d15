//! Heuristic guess of whether raw lane bits hold integer or floating-point data.
//!
//! Telling a float lane from an integer or pointer lane is undecidable from the
//! bits alone. A value is called float-like when it decodes to a finite number
//! inside a magnitude window; addresses and small integers rarely land there.

use log::debug;

use crate::Result;
use crate::core::codec::{ValueType, lane_to_bits};
use crate::core::lane::{LaneFormat, VectorClass};
use crate::core::parser::VectorRecord;

/// Classification of a single lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberType {
    /// All bits clear; fits every interpretation.
    Zero,
    /// Integer or pointer data.
    Int,
    /// Plausible binary32 value.
    Float,
    /// Plausible binary64 value.
    Double,
}

/// Tunable constants of the detector. The defaults are empirical.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Exclusive lower bound on `|value|` for a float-like lane.
    pub min_magnitude: f64,
    /// Exclusive upper bound on `|value|` for a float-like lane.
    pub max_magnitude: f64,
    /// Score contributed by a [`NumberType::Float`] lane.
    pub float_score: f64,
    /// Score contributed by a [`NumberType::Zero`] lane.
    pub zero_score: f64,
    /// Minimum total score to pick the float format.
    pub threshold: f64,
    /// Number of leading int32 lanes sampled per register.
    pub sample_lanes: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_magnitude: 1e-15,
            max_magnitude: 1e15,
            float_score: 1.0,
            zero_score: 0.5,
            threshold: 1.0,
            sample_lanes: 4,
        }
    }
}

impl DetectorConfig {
    fn in_window(&self, value: f64) -> bool {
        let magnitude = value.abs();
        self.min_magnitude < magnitude && magnitude < self.max_magnitude
    }
}

/// Classify a hex literal with the default [`DetectorConfig`].
///
/// Unless `force_double` is set, the low 32 bits are tried as binary32 first.
pub fn detect_number_type(hex: &str, force_double: bool) -> Result<NumberType> {
    let bits = lane_to_bits(hex, ValueType::Int(64))?;
    Ok(classify_bits(bits, force_double, &DetectorConfig::default()))
}

/// Classify a raw bit pattern.
pub fn classify_bits(bits: u64, force_double: bool, config: &DetectorConfig) -> NumberType {
    if bits == 0 {
        return NumberType::Zero;
    }

    if !force_double {
        let single = f32::from_bits(bits as u32);
        // Non-finite single patterns are far more often integer garbage.
        if !single.is_finite() {
            return NumberType::Int;
        }
        if config.in_window(f64::from(single)) {
            return NumberType::Float;
        }
    }

    let double = f64::from_bits(bits);
    if double.is_finite() && config.in_window(double) {
        NumberType::Double
    } else {
        NumberType::Int
    }
}

/// Float score of the first lanes of a register's int32 view.
pub fn float_score(lanes: &[String], config: &DetectorConfig) -> f64 {
    lanes
        .iter()
        .take(config.sample_lanes)
        .filter_map(|lane| lane_to_bits(lane, ValueType::Int(32)).ok())
        .map(|bits| match classify_bits(bits, false, config) {
            NumberType::Float => config.float_score,
            NumberType::Zero => config.zero_score,
            NumberType::Int | NumberType::Double => 0.0,
        })
        .sum()
}

/// Pick the lane format for a whole register of `class`.
///
/// All lanes share the result. A register without an int32 view falls back
/// to its float view if it has one.
pub fn detect_lane_format(
    record: &VectorRecord,
    class: VectorClass,
    config: &DetectorConfig,
) -> LaneFormat {
    let int_format = class.int32_format();
    let float_format = class.float_format();

    let Some(lanes) = record.get(int_format) else {
        return if record.get(float_format).is_some() {
            float_format
        } else {
            int_format
        };
    };

    let score = float_score(lanes, config);
    let chosen = if score >= config.threshold {
        float_format
    } else {
        int_format
    };

    debug!("auto-detect {class:?}: score {score} -> {chosen}");

    chosen
}
