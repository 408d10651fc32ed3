//! FFT engine using realfft for real-valued frames
//!
//! One reusable plan per run; magnitude rows are written into caller buffers
//! so the per-frame path allocates nothing.

use crate::error::RenderError;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued analysis frames
pub struct FftEngine {
    /// Transform size (frame length in samples)
    fft_size: usize,

    /// Real-to-complex forward plan
    r2c: Arc<dyn RealToComplex<f32>>,

    /// Reusable input buffer
    input_buffer: Vec<f32>,

    /// Reusable output buffer (complex spectrum)
    spectrum_buffer: Vec<num_complex::Complex<f32>>,
}

impl FftEngine {
    /// Create an engine for frames of `fft_size` samples
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let spectrum_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            spectrum_buffer,
        }
    }

    /// Compute the truncated magnitude spectrum of one frame
    ///
    /// Writes |X[k]| for `k = 0..out.len()` into `out`; no dB conversion and
    /// no normalization. When `window` is given the frame is tapered
    /// elementwise first.
    ///
    /// # Arguments
    /// * `frame` - Input frame, exactly `fft_size` samples
    /// * `window` - Optional taper of the same length
    /// * `out` - Destination row, at most `fft_size / 2 + 1` bins
    ///
    /// # Errors
    /// `TransformFailure` if the frame contains non-finite samples or the
    /// transform itself reports an error.
    pub fn magnitudes_into(
        &mut self,
        frame: &[f32],
        window: Option<&[f32]>,
        out: &mut [f32],
    ) -> Result<(), RenderError> {
        debug_assert_eq!(frame.len(), self.fft_size);
        debug_assert!(out.len() <= self.num_bins());

        match window {
            Some(taper) => {
                debug_assert_eq!(taper.len(), self.fft_size);
                for (dst, (&s, &w)) in self.input_buffer.iter_mut().zip(frame.iter().zip(taper)) {
                    *dst = s * w;
                }
            }
            None => self.input_buffer.copy_from_slice(frame),
        }

        if self.input_buffer.iter().any(|s| !s.is_finite()) {
            return Err(RenderError::TransformFailure(
                "Non-finite sample in analysis frame".to_string(),
            ));
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.spectrum_buffer)
            .map_err(|e| RenderError::TransformFailure(e.to_string()))?;

        for (dst, c) in out.iter_mut().zip(self.spectrum_buffer.iter()) {
            *dst = c.norm();
        }

        Ok(())
    }

    /// Transform size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins (fft_size/2 + 1 for a real transform)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Convert a bin index to Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(1024);

        let frame = vec![1.0; 1024];
        let mut out = vec![0.0; fft.num_bins()];
        fft.magnitudes_into(&frame, None, &mut out).unwrap();

        // DC bin carries the full sum, other bins are near zero
        assert!((out[0] - 1024.0).abs() < 1.0);
        assert!(out[10] < 1e-2);
    }

    #[test]
    fn test_fft_sine_peak_bin() {
        let mut fft = FftEngine::new(1024);

        // Sine exactly on bin 100
        let frame: Vec<f32> = (0..1024)
            .map(|n| (2.0 * PI * 100.0 * n as f32 / 1024.0).sin())
            .collect();
        let mut out = vec![0.0; fft.num_bins()];
        fft.magnitudes_into(&frame, None, &mut out).unwrap();

        let (peak_bin, &peak_mag) = out
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert_eq!(peak_bin, 100);
        // Roughly N/2 for a unit sine
        assert!(peak_mag > 400.0 && peak_mag < 600.0);
    }

    #[test]
    fn test_truncated_output() {
        let mut fft = FftEngine::new(1024);

        let frame = vec![1.0; 1024];
        let mut out = vec![-1.0; 16];
        fft.magnitudes_into(&frame, None, &mut out).unwrap();

        assert!(out.iter().all(|&m| m >= 0.0));
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn test_window_tapers_input() {
        let mut fft = FftEngine::new(256);
        let window = crate::spectrum::windowing::hann_window(256);

        let frame = vec![1.0; 256];
        let mut plain = vec![0.0; fft.num_bins()];
        let mut tapered = vec![0.0; fft.num_bins()];
        fft.magnitudes_into(&frame, None, &mut plain).unwrap();
        fft.magnitudes_into(&frame, Some(&window), &mut tapered)
            .unwrap();

        // Hann taper halves the DC sum of a constant frame
        assert!((tapered[0] - plain[0] / 2.0).abs() < 1.0);
    }

    #[test]
    fn test_non_finite_frame_rejected() {
        let mut fft = FftEngine::new(256);

        let mut frame = vec![0.0; 256];
        frame[17] = f32::NAN;
        let mut out = vec![0.0; 16];

        let err = fft.magnitudes_into(&frame, None, &mut out).unwrap_err();
        assert!(matches!(err, RenderError::TransformFailure(_)));
    }

    #[test]
    fn test_bin_to_hz() {
        let fft = FftEngine::new(2048);
        assert!((fft.bin_to_hz(0, 44100) - 0.0).abs() < 1e-6);
        assert!((fft.bin_to_hz(20, 44100) - 430.664).abs() < 1e-2);
        assert!((fft.bin_to_hz(1024, 44100) - 22050.0).abs() < 1e-2);
    }
}
