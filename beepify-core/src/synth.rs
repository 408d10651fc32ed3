//! Additive sinusoidal resynthesis
//!
//! Turns extracted peaks back into audio as short Hann-enveloped sine
//! bursts accumulated into one output buffer.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::peaks::Peak;
use crate::spectrum::hann_window;
use log::debug;
use std::f32::consts::PI;

/// Render peaks into a waveform of exactly `output_len` samples
///
/// Each peak becomes a sine burst at `bin * sample_rate / window_len` Hz,
/// centered on the peak frame's window center, `time_win * hop_len` samples
/// long and scaled by the peak magnitude. Bursts overhanging the buffer are
/// truncated; the envelope and phase keep their local indexing, they are not
/// recomputed for the shorter burst. The burst phase starts at zero at the
/// nominal burst start, so bursts are phase-independent of one another.
///
/// Zero-magnitude peaks contribute nothing. After accumulation the buffer is
/// divided by its absolute maximum only when that maximum exceeds 1.0.
///
/// # Errors
/// * `InvalidConfig` for a zero sample rate or out-of-bounds configuration
/// * `ResourceExhaustion` when the output buffer cannot be allocated
pub fn synthesize(
    peaks: &[Peak],
    config: &RenderConfig,
    sample_rate: u32,
    output_len: usize,
) -> Result<Vec<f32>, RenderError> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(RenderError::InvalidConfig(
            "Sample rate must be positive".to_string(),
        ));
    }

    let mut out: Vec<f32> = Vec::new();
    out.try_reserve_exact(output_len).map_err(|_| {
        RenderError::ResourceExhaustion(format!("Failed to allocate {} output samples", output_len))
    })?;
    out.resize(output_len, 0.0);
    if output_len == 0 {
        return Ok(out);
    }

    let burst_len = config.burst_len();
    let envelope = hann_window(burst_len);
    let sr = sample_rate as f32;

    for peak in peaks {
        if peak.magnitude == 0.0 {
            continue;
        }

        let freq = peak.bin as f32 * sr / config.window_len as f32;
        let omega = 2.0 * PI * freq / sr;

        let center = (peak.frame * config.hop_len + config.window_len / 2).min(output_len - 1);
        let start = center as isize - (burst_len / 2) as isize;

        let first = if start < 0 { (-start) as usize } else { 0 };
        for j in first..burst_len {
            let t = (start + j as isize) as usize;
            if t >= output_len {
                break;
            }
            out[t] += peak.magnitude * envelope[j] * (omega * j as f32).sin();
        }
    }

    let max_abs = out.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
    if max_abs > 1.0 {
        let scale = 1.0 / max_abs;
        for v in out.iter_mut() {
            *v *= scale;
        }
        debug!("Output peaked at {:.3}, rescaled to unit range", max_abs);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(frame: usize, bin: usize, magnitude: f32) -> Peak {
        Peak {
            frame,
            bin,
            magnitude,
        }
    }

    #[test]
    fn test_output_length_honored() {
        let config = RenderConfig::default();
        for &len in &[0usize, 1, 1000, 4096, 44100] {
            let out = synthesize(&[peak(0, 20, 0.5)], &config, 44100, len).unwrap();
            assert_eq!(out.len(), len);
        }
    }

    #[test]
    fn test_no_peaks_renders_silence() {
        let config = RenderConfig::default();
        let out = synthesize(&[], &config, 44100, 4096).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_magnitude_peaks_render_silence() {
        let config = RenderConfig::default();
        let peaks = vec![peak(0, 20, 0.0), peak(1, 100, 0.0)];
        let out = synthesize(&peaks, &config, 44100, 4096).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_burst_truncated_at_buffer_edges() {
        let config = RenderConfig::default();
        // Burst is 8192 samples around sample 1024; only 4096 fit
        let out = synthesize(&[peak(0, 20, 0.5)], &config, 44100, 4096).unwrap();
        assert_eq!(out.len(), 4096);
        assert!(out.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_amplitude_follows_magnitude() {
        let config = RenderConfig::default();
        let loud = synthesize(&[peak(0, 20, 0.2)], &config, 44100, 8192).unwrap();
        let quiet = synthesize(&[peak(0, 20, 0.1)], &config, 44100, 8192).unwrap();

        let max = |v: &[f32]| v.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        let ratio = max(&loud) / max(&quiet);
        assert!((ratio - 2.0).abs() < 1e-3, "ratio {}", ratio);
    }

    #[test]
    fn test_rescale_only_above_unity() {
        let config = RenderConfig::default();

        let quiet = synthesize(&[peak(0, 20, 0.4)], &config, 44100, 16384).unwrap();
        let quiet_max = quiet.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(quiet_max <= 1.0 && quiet_max > 0.1);

        let loud = synthesize(&[peak(0, 20, 10.0)], &config, 44100, 16384).unwrap();
        let loud_max = loud.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(loud_max <= 1.0 + 1e-6);
        assert!(loud_max > 0.9);
    }

    #[test]
    fn test_burst_frequency() {
        // Window 1024, hop 512, one-frame bursts of 512 samples
        let config = RenderConfig::new(1024, 512, 256, 1, 5, true).unwrap();
        let out = synthesize(&[peak(0, 100, 0.5)], &config, 44100, 2048).unwrap();

        // Bin 100 of a 1024 window at 44100 Hz is 4306.6 Hz; over a 512
        // sample burst that is 50 cycles, so about 100 sign changes
        let crossings = out
            .windows(2)
            .filter(|pair| pair[0] * pair[1] < 0.0)
            .count();
        assert!((90..=110).contains(&crossings), "crossings {}", crossings);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = RenderConfig::default();
        let err = synthesize(&[], &config, 0, 1024).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }
}
