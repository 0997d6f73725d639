//! Level measurements
//!
//! Objective measurements used to drive normalization and to verify the
//! pipeline in tests: RMS, peak, DC offset and dB conversions.

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Convert decibels to linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Summary levels of a block of samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelAnalysis {
    /// RMS level in linear scale
    pub rms_linear: f32,
    /// Peak level in linear scale
    pub peak_linear: f32,
    /// DC offset (mean of all samples)
    pub dc_offset: f32,
}

impl LevelAnalysis {
    /// Measure a block of samples
    pub fn analyze(samples: &[f32]) -> Self {
        Self {
            rms_linear: calculate_rms(samples),
            peak_linear: calculate_peak(samples),
            dc_offset: calculate_dc_offset(samples),
        }
    }

    /// RMS level in dBFS
    pub fn rms_db(&self) -> f32 {
        linear_to_db(self.rms_linear)
    }

    /// Peak level in dBFS
    pub fn peak_db(&self) -> f32 {
        linear_to_db(self.peak_linear)
    }

    /// Check if audio is silent (RMS below threshold)
    pub fn is_silent(&self, threshold_db: f32) -> bool {
        self.rms_db() < threshold_db
    }
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Calculate DC offset (mean of samples)
pub fn calculate_dc_offset(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64).sum();
    (sum / samples.len() as f64) as f32
}
