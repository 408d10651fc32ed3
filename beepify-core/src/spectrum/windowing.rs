//! Hann window and frame iteration
//!
//! Splits a signal into overlapping analysis frames and generates the taper
//! applied before the transform.

/// Generate a Hann window of the given length
///
/// w[n] = 0.5 * (1 - cos(2*pi*n / (len - 1))), zero at both endpoints.
pub fn hann_window(len: usize) -> Vec<f32> {
    let denom = (len - 1) as f32;
    (0..len)
        .map(|n| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * n as f32 / denom).cos()))
        .collect()
}

/// Number of complete frames of `window_len` samples at stride `hop_len`
///
/// Trailing samples that cannot fill a frame are dropped, never zero-padded.
pub fn frame_count(signal_len: usize, window_len: usize, hop_len: usize) -> usize {
    debug_assert!(window_len > 0 && hop_len > 0);
    if signal_len < window_len {
        0
    } else {
        (signal_len - window_len) / hop_len + 1
    }
}

/// Iterator over complete analysis frames
///
/// Yields borrowed sub-slices of length `window_len` starting at multiples
/// of `hop_len`; exactly [`frame_count`] of them.
pub struct Frames<'a> {
    samples: &'a [f32],
    window_len: usize,
    hop_len: usize,
    pos: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<&'a [f32]> {
        if self.pos + self.window_len > self.samples.len() {
            return None;
        }
        let frame = &self.samples[self.pos..self.pos + self.window_len];
        self.pos += self.hop_len;
        Some(frame)
    }
}

/// Iterate over the complete frames of `samples`
pub fn frames(samples: &[f32], window_len: usize, hop_len: usize) -> Frames<'_> {
    debug_assert!(window_len > 0 && hop_len > 0);
    Frames {
        samples,
        window_len,
        hop_len,
        pos: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_endpoints_and_symmetry() {
        let window = hann_window(256);
        assert_eq!(window.len(), 256);

        // Endpoints are zero
        assert!(window[0].abs() < 1e-7);
        assert!(window[255].abs() < 1e-7);

        // Symmetric about the midpoint
        for i in 0..128 {
            assert!((window[i] - window[255 - i]).abs() < 1e-6);
        }

        // Never exceeds one
        assert!(window.iter().all(|&w| w <= 1.0 + 1e-6));
    }

    #[test]
    fn test_hann_peak_for_odd_length() {
        let window = hann_window(257);
        assert!((window[128] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(4096, 2048, 1024), 3);
        assert_eq!(frame_count(2048, 2048, 1024), 1);
        assert_eq!(frame_count(2047, 2048, 1024), 0);
        assert_eq!(frame_count(0, 2048, 1024), 0);
        // One trailing sample short of a fourth frame
        assert_eq!(frame_count(5119, 2048, 1024), 3);
        assert_eq!(frame_count(5120, 2048, 1024), 4);
    }

    #[test]
    fn test_frames_yield_expected_slices() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let got: Vec<&[f32]> = frames(&samples, 4, 2).collect();

        assert_eq!(got.len(), frame_count(10, 4, 2));
        assert_eq!(got[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(got[1], &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(got[3], &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_frames_empty_when_signal_too_short() {
        let samples = vec![0.0; 3];
        assert_eq!(frames(&samples, 4, 2).count(), 0);
    }
}
