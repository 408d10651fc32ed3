//! Sequential render pipeline
//!
//! Composes analysis, peak extraction and synthesis for synchronous callers;
//! the job layer drives the same stages with progress reporting in between.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::peaks::{extract_peaks, Peak};
use crate::signal::Signal;
use crate::spectrum::{compute_spectrogram, Spectrogram};
use crate::synth::synthesize;
use log::debug;

/// Result of one render run
///
/// The waveform always matches the input length. The spectrogram and peak
/// list are populated only when the caller asked for them.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Resynthesized waveform, same length as the input signal
    pub waveform: Vec<f32>,

    /// Sample rate of the waveform in Hz
    pub sample_rate: u32,

    /// Magnitude spectrogram, when requested
    pub spectrogram: Option<Spectrogram>,

    /// Extracted peaks in tile order, when requested
    pub peaks: Option<Vec<Peak>>,
}

/// Run the full pipeline on the calling thread
///
/// # Arguments
/// * `signal` - Input signal
/// * `config` - Render parameters
/// * `emit_spectrogram` - Include the spectrogram and peak list in the output
pub fn render_full(
    signal: &Signal,
    config: &RenderConfig,
    emit_spectrogram: bool,
) -> Result<RenderOutput, RenderError> {
    config.validate()?;

    let spectrogram = compute_spectrogram(signal, config)?;
    let peaks = extract_peaks(&spectrogram, config.time_win, config.freq_win);
    debug!("Extracted {} peaks", peaks.len());

    let waveform = synthesize(&peaks, config, signal.sample_rate(), signal.len())?;

    let (spectrogram, peaks) = if emit_spectrogram {
        (Some(spectrogram), Some(peaks))
    } else {
        (None, None)
    };

    Ok(RenderOutput {
        waveform,
        sample_rate: signal.sample_rate(),
        spectrogram,
        peaks,
    })
}

/// Run the full pipeline and return only the waveform
pub fn render(signal: &Signal, config: &RenderConfig) -> Result<Vec<f32>, RenderError> {
    render_full(signal, config, false).map(|output| output.waveform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_signal(freq_hz: f32, sample_rate: u32, len: usize) -> Signal {
        let samples: Vec<f32> = (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f32 / sample_rate as f32).sin())
            .collect();
        Signal::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_waveform_matches_input_length() {
        let signal = sine_signal(440.0, 44100, 10_000);
        let config = RenderConfig::default();

        let output = render_full(&signal, &config, false).unwrap();
        assert_eq!(output.waveform.len(), 10_000);
        assert_eq!(output.sample_rate, 44100);
    }

    #[test]
    fn test_emit_flag_gates_analysis_products() {
        let signal = sine_signal(440.0, 44100, 8192);
        let config = RenderConfig::default();

        let bare = render_full(&signal, &config, false).unwrap();
        assert!(bare.spectrogram.is_none());
        assert!(bare.peaks.is_none());

        let full = render_full(&signal, &config, true).unwrap();
        let spectrogram = full.spectrogram.unwrap();
        let peaks = full.peaks.unwrap();
        assert_eq!(spectrogram.num_frames(), 7);
        assert!(!peaks.is_empty());
    }

    #[test]
    fn test_short_signal_propagates_error() {
        let signal = Signal::new(vec![0.0; 100], 44100).unwrap();
        let config = RenderConfig::default();

        let err = render(&signal, &config).unwrap_err();
        assert_eq!(
            err,
            RenderError::InsufficientSignal {
                needed: 2048,
                got: 100
            }
        );
    }

    #[test]
    fn test_render_sugar_matches_full() {
        let signal = sine_signal(440.0, 44100, 8192);
        let config = RenderConfig::default();

        let waveform = render(&signal, &config).unwrap();
        let full = render_full(&signal, &config, true).unwrap();
        assert_eq!(waveform, full.waveform);
    }
}
