//! Spectrogram computation
//!
//! Runs the windowed FFT over every complete frame and collects the
//! truncated magnitude rows into one dense matrix.

use super::fft::FftEngine;
use super::windowing::{frame_count, frames, hann_window};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::signal::Signal;
use log::debug;
use ndarray::Array2;

/// Magnitude spectrogram with its analysis geometry
///
/// Row `i` covers the frame starting at sample `i * hop_len`; column `k`
/// is the magnitude of frequency `k * sample_rate / window_len` Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    mags: Array2<f32>,
    window_len: usize,
    hop_len: usize,
    sample_rate: u32,
}

impl Spectrogram {
    /// Wrap an existing magnitude matrix with its analysis geometry
    ///
    /// Rows are frames, columns are bins. Useful for running peak extraction
    /// over a matrix computed elsewhere.
    pub fn from_parts(
        mags: Array2<f32>,
        window_len: usize,
        hop_len: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            mags,
            window_len,
            hop_len,
            sample_rate,
        }
    }

    /// Number of analysis frames (rows)
    pub fn num_frames(&self) -> usize {
        self.mags.nrows()
    }

    /// Number of frequency bins kept per frame (columns)
    pub fn num_bins(&self) -> usize {
        self.mags.ncols()
    }

    /// Borrow the magnitude matrix
    pub fn magnitudes(&self) -> &Array2<f32> {
        &self.mags
    }

    /// Magnitude of one cell
    pub fn magnitude(&self, frame: usize, bin: usize) -> f32 {
        self.mags[[frame, bin]]
    }

    /// Analysis window length in samples
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Hop between frames in samples
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Sample rate of the analyzed signal in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Center frequency of a bin in Hz
    pub fn bin_frequency_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.window_len as f32
    }

    /// First sample covered by a frame
    pub fn frame_sample(&self, frame: usize) -> usize {
        frame * self.hop_len
    }

    /// Start time of a frame in seconds
    pub fn frame_time_secs(&self, frame: usize) -> f32 {
        self.frame_sample(frame) as f32 / self.sample_rate as f32
    }
}

/// Compute the magnitude spectrogram of a signal
///
/// Deterministic: the same signal and configuration always produce a
/// bit-identical matrix.
///
/// # Errors
/// * `InsufficientSignal` when not even one frame fits
/// * `TransformFailure` on non-finite samples
/// * `ResourceExhaustion` when the matrix cannot be allocated
pub fn compute_spectrogram(
    signal: &Signal,
    config: &RenderConfig,
) -> Result<Spectrogram, RenderError> {
    config.validate()?;

    let window_len = config.window_len;
    let num_frames = frame_count(signal.len(), window_len, config.hop_len);
    if num_frames == 0 {
        return Err(RenderError::InsufficientSignal {
            needed: window_len,
            got: signal.len(),
        });
    }

    let num_bins = config.max_bin;
    let cells = num_frames.checked_mul(num_bins).ok_or_else(|| {
        RenderError::ResourceExhaustion(format!(
            "Spectrogram of {} x {} cells overflows",
            num_frames, num_bins
        ))
    })?;

    let mut data: Vec<f32> = Vec::new();
    data.try_reserve_exact(cells).map_err(|_| {
        RenderError::ResourceExhaustion(format!("Failed to allocate {} spectrogram cells", cells))
    })?;

    let window = if config.use_window {
        Some(hann_window(window_len))
    } else {
        None
    };

    let mut engine = FftEngine::new(window_len);
    let mut row = vec![0.0f32; num_bins];
    for frame in frames(signal.samples(), window_len, config.hop_len) {
        engine.magnitudes_into(frame, window.as_deref(), &mut row)?;
        data.extend_from_slice(&row);
    }

    let mags = Array2::from_shape_vec((num_frames, num_bins), data)
        .map_err(|e| RenderError::TransformFailure(e.to_string()))?;

    debug!(
        "Spectrogram: {} frames x {} bins (window {}, hop {})",
        num_frames, num_bins, window_len, config.hop_len
    );

    Ok(Spectrogram::from_parts(
        mags,
        window_len,
        config.hop_len,
        signal.sample_rate(),
    ))
}
