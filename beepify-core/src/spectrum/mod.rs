//! Short-time spectral analysis

pub mod fft;
pub mod spectrogram;
pub mod windowing;

pub use fft::FftEngine;
pub use spectrogram::{compute_spectrogram, Spectrogram};
pub use windowing::{frame_count, hann_window};
