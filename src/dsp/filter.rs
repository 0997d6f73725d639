//! High-pass filter
//!
//! Second-order Butterworth high-pass built from the Audio EQ Cookbook
//! biquad. Removes DC and sub-audible rumble before encoding.

use std::f64::consts::PI;

/// Butterworth Q for a second-order section
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (a0 + a1*z^-1 + a2*z^-2)
/// Normalized: all coefficients divided by a0
#[derive(Debug, Clone, Copy, PartialEq)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    fn high_pass(sample_rate: f64, cutoff_hz: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let b0 = (1.0 + cos_w0) / 2.0;
        let b1 = -(1.0 + cos_w0);
        let b2 = (1.0 + cos_w0) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Single-channel high-pass biquad
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    coeffs: BiquadCoeffs,
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl HighPassFilter {
    /// Build a Butterworth high-pass at `cutoff_hz`
    ///
    /// Returns `None` when the cutoff is zero or at/above Nyquist, meaning
    /// there is nothing to filter.
    pub fn new(sample_rate: u32, cutoff_hz: f32) -> Option<Self> {
        let sample_rate = sample_rate as f64;
        let cutoff = cutoff_hz as f64;
        if cutoff <= 0.0 || cutoff >= sample_rate / 2.0 {
            return None;
        }
        Some(Self {
            coeffs: BiquadCoeffs::high_pass(sample_rate, cutoff, BUTTERWORTH_Q),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    /// Process one sample (Direct Form I)
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let input = input as f64;
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output as f32
    }

    /// Filter a block in place
    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Apply a fresh high-pass to a mono block; a disabled cutoff is a no-op
pub fn high_pass(samples: &mut [f32], sample_rate: u32, cutoff_hz: f32) {
    if let Some(mut filter) = HighPassFilter::new(sample_rate, cutoff_hz) {
        filter.process(samples);
    }
}
