//! Signal processing
//!
//! Sample-level building blocks for container normalization:
//! - Downmix and linear resampling to the canonical layout
//! - Peak normalization
//! - Butterworth high-pass for DC and rumble
//! - Level analysis used for verification

pub mod analysis;
pub mod filter;
pub mod gain;
pub mod resample;

pub use analysis::{calculate_dc_offset, calculate_peak, calculate_rms, db_to_linear, linear_to_db, LevelAnalysis};
pub use filter::{high_pass, HighPassFilter};
pub use gain::peak_normalize;
pub use resample::{downmix_to_mono, quantize_i16, resample};
