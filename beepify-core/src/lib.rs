//! Beepify - Sparse Spectral Resynthesis
//!
//! Turns a mono recording into a "beepy" reinterpretation: short-time
//! spectral analysis, one peak per time/frequency tile, then additive
//! resynthesis of the peaks as Hann-enveloped sine bursts. The output
//! waveform always has the length of the input.
//!
//! # Quick start
//!
//! ```
//! use beepify::{beepify, RenderConfig};
//!
//! let sample_rate = 44100;
//! let sine: Vec<f32> = (0..sample_rate as usize)
//!     .map(|n| (2.0 * std::f32::consts::PI * 440.0 * n as f32 / sample_rate as f32).sin())
//!     .collect();
//!
//! let beeps = beepify(&sine, sample_rate, &RenderConfig::default())?;
//! assert_eq!(beeps.len(), sine.len());
//! # Ok::<(), beepify::RenderError>(())
//! ```
//!
//! For progress reporting and cancellation, submit a [`RenderJob`] instead
//! and poll its events.

pub mod config;
pub mod error;
pub mod job;
pub mod peaks;
pub mod pipeline;
pub mod signal;
pub mod spectrum;
pub mod synth;

pub use config::RenderConfig;
pub use error::RenderError;
pub use job::{JobEvent, RenderJob, Stage};
pub use peaks::{extract_peaks, local_maxima, Peak};
pub use pipeline::{render, render_full, RenderOutput};
pub use signal::Signal;
pub use spectrum::{compute_spectrogram, Spectrogram};

/// Render a sample buffer in one call
///
/// Convenience wrapper over [`Signal::new`] and [`render`] for callers that
/// just want the waveform.
///
/// # Arguments
/// * `samples` - Mono samples, nominally in [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Render parameters
///
/// # Errors
/// Any [`RenderError`] from validation, analysis or synthesis.
pub fn beepify(
    samples: &[f32],
    sample_rate: u32,
    config: &RenderConfig,
) -> Result<Vec<f32>, RenderError> {
    let signal = Signal::new(samples.to_vec(), sample_rate)?;
    render(&signal, config)
}
