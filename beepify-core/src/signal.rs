//! Input signal container
//!
//! Immutable mono sample buffer shared cheaply between the caller and the
//! render worker.

use crate::error::RenderError;
use std::sync::Arc;

/// Mono audio signal with its sample rate
///
/// Samples are behind an `Arc`, so clones are cheap and a background run
/// never copies the caller's buffer.
#[derive(Debug, Clone)]
pub struct Signal {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
}

impl Signal {
    /// Create a signal from owned samples
    ///
    /// # Errors
    /// `InvalidConfig` if `sample_rate` is zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, RenderError> {
        if sample_rate == 0 {
            return Err(RenderError::InvalidConfig(
                "Sample rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            samples: Arc::new(samples),
            sample_rate,
        })
    }

    /// Borrow the sample buffer
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sample_rate_rejected() {
        let err = Signal::new(vec![0.0; 100], 0).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }

    #[test]
    fn test_duration() {
        let signal = Signal::new(vec![0.0; 22050], 44100).unwrap();
        assert!((signal.duration_secs() - 0.5).abs() < 1e-6);
        assert_eq!(signal.len(), 22050);
        assert!(!signal.is_empty());
    }

    #[test]
    fn test_clone_shares_buffer() {
        let signal = Signal::new(vec![1.0, 2.0, 3.0], 44100).unwrap();
        let copy = signal.clone();
        assert_eq!(signal.samples().as_ptr(), copy.samples().as_ptr());
    }
}
