//! Render configuration with validation and clamping
//!
//! All parameter bounds live here so every pipeline entry point can assume
//! a well-formed configuration.

use crate::error::RenderError;

/// Smallest accepted analysis window (samples)
pub const MIN_WINDOW_LEN: usize = 128;
/// Largest accepted analysis window (samples)
pub const MAX_WINDOW_LEN: usize = 8192;
/// Smallest accepted hop (samples)
pub const MIN_HOP_LEN: usize = 128;
/// Largest accepted hop (samples)
pub const MAX_HOP_LEN: usize = 8192;
/// Smallest accepted bin cutoff
pub const MIN_MAX_BIN: usize = 10;
/// Largest accepted bin cutoff (further limited to half the window)
pub const MAX_MAX_BIN: usize = 4096;
/// Smallest accepted tile span (frames or bins)
pub const MIN_TILE_SPAN: usize = 1;
/// Largest accepted tile span (frames or bins)
pub const MAX_TILE_SPAN: usize = 40;

/// Parameters for one render run
///
/// Build with [`RenderConfig::new`] to get the documented rounding and
/// clamping; hand-built values are checked again by [`RenderConfig::validate`]
/// at every pipeline entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Analysis window length in samples (power of two)
    pub window_len: usize,

    /// Hop between consecutive frames in samples (power of two)
    pub hop_len: usize,

    /// Number of low-frequency bins kept per frame
    pub max_bin: usize,

    /// Tile height in frames for peak extraction
    pub time_win: usize,

    /// Tile width in bins for peak extraction
    pub freq_win: usize,

    /// Apply a Hann taper to each frame before the transform
    pub use_window: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_len: 2048,
            hop_len: 1024,
            max_bin: 256,
            time_win: 8,
            freq_win: 5,
            use_window: true,
        }
    }
}

impl RenderConfig {
    /// Build a configuration from raw parameter values
    ///
    /// Window and hop are rounded to the nearest power of two in log space
    /// (2000 becomes 2048, 1400 becomes 1024) and clamped into
    /// `[MIN_WINDOW_LEN, MAX_WINDOW_LEN]`. The bin cutoff is clamped into
    /// `[MIN_MAX_BIN, min(MAX_MAX_BIN, window/2)]` and the tile spans into
    /// `[MIN_TILE_SPAN, MAX_TILE_SPAN]`.
    ///
    /// # Errors
    /// `InvalidConfig` if `window_len` or `hop_len` is zero; zero is a
    /// degenerate request, not a value to round.
    pub fn new(
        window_len: usize,
        hop_len: usize,
        max_bin: usize,
        time_win: usize,
        freq_win: usize,
        use_window: bool,
    ) -> Result<Self, RenderError> {
        if window_len == 0 {
            return Err(RenderError::InvalidConfig(
                "Window length must be positive".to_string(),
            ));
        }
        if hop_len == 0 {
            return Err(RenderError::InvalidConfig(
                "Hop length must be positive".to_string(),
            ));
        }

        let window_len = nearest_pow2(window_len).clamp(MIN_WINDOW_LEN, MAX_WINDOW_LEN);
        let hop_len = nearest_pow2(hop_len).clamp(MIN_HOP_LEN, MAX_HOP_LEN);
        let max_bin = max_bin.clamp(MIN_MAX_BIN, MAX_MAX_BIN.min(window_len / 2));
        let time_win = time_win.clamp(MIN_TILE_SPAN, MAX_TILE_SPAN);
        let freq_win = freq_win.clamp(MIN_TILE_SPAN, MAX_TILE_SPAN);

        Ok(Self {
            window_len,
            hop_len,
            max_bin,
            time_win,
            freq_win,
            use_window,
        })
    }

    /// Check that every field satisfies the documented bounds
    ///
    /// Configurations built with [`RenderConfig::new`] always pass; this
    /// catches hand-built struct literals before they reach the pipeline.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !self.window_len.is_power_of_two()
            || !(MIN_WINDOW_LEN..=MAX_WINDOW_LEN).contains(&self.window_len)
        {
            return Err(RenderError::InvalidConfig(format!(
                "Window length {} must be a power of two in [{}, {}]",
                self.window_len, MIN_WINDOW_LEN, MAX_WINDOW_LEN
            )));
        }
        if !self.hop_len.is_power_of_two() || !(MIN_HOP_LEN..=MAX_HOP_LEN).contains(&self.hop_len) {
            return Err(RenderError::InvalidConfig(format!(
                "Hop length {} must be a power of two in [{}, {}]",
                self.hop_len, MIN_HOP_LEN, MAX_HOP_LEN
            )));
        }
        let bin_limit = MAX_MAX_BIN.min(self.window_len / 2);
        if !(MIN_MAX_BIN..=bin_limit).contains(&self.max_bin) {
            return Err(RenderError::InvalidConfig(format!(
                "Bin cutoff {} must lie in [{}, {}]",
                self.max_bin, MIN_MAX_BIN, bin_limit
            )));
        }
        if !(MIN_TILE_SPAN..=MAX_TILE_SPAN).contains(&self.time_win) {
            return Err(RenderError::InvalidConfig(format!(
                "Time span {} must lie in [{}, {}]",
                self.time_win, MIN_TILE_SPAN, MAX_TILE_SPAN
            )));
        }
        if !(MIN_TILE_SPAN..=MAX_TILE_SPAN).contains(&self.freq_win) {
            return Err(RenderError::InvalidConfig(format!(
                "Frequency span {} must lie in [{}, {}]",
                self.freq_win, MIN_TILE_SPAN, MAX_TILE_SPAN
            )));
        }
        Ok(())
    }

    /// Nominal burst length used by the synthesizer, in samples
    pub fn burst_len(&self) -> usize {
        self.time_win * self.hop_len
    }
}

/// Round to the nearest power of two in log space
fn nearest_pow2(v: usize) -> usize {
    debug_assert!(v > 0);
    let max_exp = MAX_WINDOW_LEN.trailing_zeros() as f64;
    let exp = (v as f64).log2().round().clamp(0.0, max_exp) as u32;
    1 << exp
}
