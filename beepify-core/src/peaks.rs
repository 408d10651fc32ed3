//! Peak extraction from the magnitude spectrogram
//!
//! The render pipeline thins the matrix to one peak per time/frequency tile;
//! [`local_maxima`] is the neighborhood variant used for plotting overlays.

use crate::spectrum::Spectrogram;

/// One spectral peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Frame index (row)
    pub frame: usize,

    /// Bin index (column)
    pub bin: usize,

    /// Magnitude at that cell
    pub magnitude: f32,
}

impl Peak {
    /// Center frequency of this peak within its spectrogram, in Hz
    pub fn frequency_hz(&self, spectrogram: &Spectrogram) -> f32 {
        spectrogram.bin_frequency_hz(self.bin)
    }
}

/// Extract one peak per `time_win` x `freq_win` tile
///
/// The matrix is partitioned into a grid of tiles starting at row 0 and
/// column 0; the last tile in each direction may be partial but still
/// produces a peak. Cells are scanned row-major with a strictly-greater
/// comparison, so an all-equal tile reports its lowest frame index and,
/// within that frame, its lowest bin index. Tiles are emitted row-major,
/// giving `ceil(frames / time_win) * ceil(bins / freq_win)` peaks.
pub fn extract_peaks(spectrogram: &Spectrogram, time_win: usize, freq_win: usize) -> Vec<Peak> {
    debug_assert!(time_win > 0 && freq_win > 0);

    let num_frames = spectrogram.num_frames();
    let num_bins = spectrogram.num_bins();
    if num_frames == 0 || num_bins == 0 {
        return Vec::new();
    }

    let tile_rows = num_frames.div_ceil(time_win);
    let tile_cols = num_bins.div_ceil(freq_win);

    let mut peaks = Vec::with_capacity(tile_rows * tile_cols);
    for tile_row in 0..tile_rows {
        let frame_start = tile_row * time_win;
        let frame_end = (frame_start + time_win).min(num_frames);

        for tile_col in 0..tile_cols {
            let bin_start = tile_col * freq_win;
            let bin_end = (bin_start + freq_win).min(num_bins);

            let mut best = Peak {
                frame: frame_start,
                bin: bin_start,
                magnitude: spectrogram.magnitude(frame_start, bin_start),
            };
            for frame in frame_start..frame_end {
                for bin in bin_start..bin_end {
                    let magnitude = spectrogram.magnitude(frame, bin);
                    if magnitude > best.magnitude {
                        best = Peak {
                            frame,
                            bin,
                            magnitude,
                        };
                    }
                }
            }
            peaks.push(best);
        }
    }

    peaks
}

/// Find cells that dominate their `+-time_win` x `+-freq_win` neighborhood
///
/// A cell survives when no cell in the edge-clipped neighborhood is strictly
/// greater, so plateau cells all survive. Output is in row-major cell order.
pub fn local_maxima(spectrogram: &Spectrogram, time_win: usize, freq_win: usize) -> Vec<Peak> {
    let num_frames = spectrogram.num_frames();
    let num_bins = spectrogram.num_bins();

    let mut maxima = Vec::new();
    for frame in 0..num_frames {
        let frame_lo = frame.saturating_sub(time_win);
        let frame_hi = (frame + time_win).min(num_frames.saturating_sub(1));

        'cells: for bin in 0..num_bins {
            let bin_lo = bin.saturating_sub(freq_win);
            let bin_hi = (bin + freq_win).min(num_bins.saturating_sub(1));
            let magnitude = spectrogram.magnitude(frame, bin);

            for other_frame in frame_lo..=frame_hi {
                for other_bin in bin_lo..=bin_hi {
                    if spectrogram.magnitude(other_frame, other_bin) > magnitude {
                        continue 'cells;
                    }
                }
            }
            maxima.push(Peak {
                frame,
                bin,
                magnitude,
            });
        }
    }

    maxima
}
