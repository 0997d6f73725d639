//! Gain and peak normalization
//!
//! Normalization rescales a block so its absolute peak lands exactly at
//! `-headroom_db` dBFS. Every source therefore leaves the pipeline at the
//! same peak level, regardless of how loud its provider rendered it.

use crate::dsp::analysis::{calculate_peak, db_to_linear};

/// Peaks at or below this level are treated as digital silence (-120 dBFS)
const SILENCE_PEAK: f32 = 1e-6;

/// Normalize a block so its peak sits `headroom_db` below full scale
///
/// Returns the linear gain that was applied. Silent input is left untouched
/// and reports a gain of 1.0.
pub fn peak_normalize(samples: &mut [f32], headroom_db: f32) -> f32 {
    let peak = calculate_peak(samples);
    if peak <= SILENCE_PEAK {
        return 1.0;
    }

    let target = db_to_linear(-headroom_db.max(0.0));
    let gain = target / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
    gain
}
