/*!
 * Time-budget allocation across segments.
 *
 * Converts a segment list plus a known total duration into contiguous
 * (start, end, duration, speech rate) slots whose durations sum exactly
 * to the total. Slot weight is the segment's trimmed character length;
 * speech rate comes from a words-per-minute banding table and is fixed
 * before the rescale pass.
 */

use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::segment::Segment;

/// Derived timing slot for one segment, recomputed fresh each run
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTiming {
    /// Original segment index
    pub index: usize,
    /// Slot start in seconds from track origin
    pub start: f64,
    /// Slot end in seconds
    pub end: f64,
    /// Slot duration in seconds
    pub duration: f64,
    /// Relative speech-rate adjustment in percent (negative slows down)
    pub speech_rate: f32,
}

/// Allocates time slots for segments against a fixed total duration
#[derive(Debug, Clone)]
pub struct TimingAllocator {
    config: TimingConfig,
}

impl TimingAllocator {
    /// Create an allocator with default policy
    pub fn new() -> Self {
        Self::with_config(TimingConfig::default())
    }

    /// Create an allocator with custom policy
    pub fn with_config(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Allocate contiguous slots for all segments.
    ///
    /// Returns an empty list for an empty segment set; validation upstream
    /// rejects those before allocation is reached.
    pub fn allocate(&self, segments: &[Segment], total_duration: f64) -> Vec<SegmentTiming> {
        if segments.is_empty() || total_duration <= 0.0 {
            return Vec::new();
        }

        let total_chars: usize = segments.iter().map(|s| s.trimmed_len()).sum();

        // Proportional pass: weight by character share, floor against
        // zero-length slots. All-empty text falls back to equal division.
        let mut durations: Vec<f64> = if total_chars == 0 {
            let equal = total_duration / segments.len() as f64;
            vec![equal; segments.len()]
        } else {
            segments
                .iter()
                .map(|s| {
                    let proportional =
                        total_duration * s.trimmed_len() as f64 / total_chars as f64;
                    proportional.max(self.config.min_segment_duration)
                })
                .collect()
        };

        // Speech rates are fixed from the proportional durations. Recomputing
        // them after the rescale pass compounds timing error, so they are
        // computed once here and never touched again.
        let rates: Vec<f32> = segments
            .iter()
            .zip(durations.iter())
            .map(|(segment, duration)| self.speech_rate_for(segment, *duration))
            .collect();

        // Rescale pass: force the running sum back onto the total when the
        // floor (or rounding) pushed it out of tolerance.
        let running_sum: f64 = durations.iter().sum();
        if (running_sum - total_duration).abs() > self.config.sum_tolerance {
            let scale = total_duration / running_sum;
            debug!(
                "Rescaling slot durations by {:.4} (sum {:.3}s vs total {:.3}s)",
                scale, running_sum, total_duration
            );
            for duration in &mut durations {
                *duration *= scale;
            }
        }

        // Build contiguous slots; the final segment absorbs residual
        // rounding so its end lands on the total exactly.
        let mut timings = Vec::with_capacity(segments.len());
        let mut cursor = 0.0_f64;
        let last = durations.len() - 1;

        for (index, duration) in durations.iter().enumerate() {
            let start = cursor;
            let end = if index == last {
                total_duration
            } else {
                start + duration
            };

            timings.push(SegmentTiming {
                index,
                start,
                end,
                duration: end - start,
                speech_rate: rates[index],
            });

            cursor = end;
        }

        if let Some(final_timing) = timings.last() {
            if final_timing.duration < self.config.min_segment_duration {
                warn!(
                    "Final slot squeezed to {:.3}s after rescale",
                    final_timing.duration
                );
            }
        }

        timings
    }

    /// Look up the rate band for a segment spoken over the given duration
    fn speech_rate_for(&self, segment: &Segment, duration: f64) -> f32 {
        if duration <= 0.0 {
            return 0.0;
        }

        let wpm = segment.word_count() as f64 * 60.0 / duration;
        let c = &self.config;

        if wpm > c.fast_wpm {
            c.fast_rate_delta
        } else if wpm > c.mid_fast_wpm {
            c.mid_fast_rate_delta
        } else if wpm < c.slow_wpm {
            c.slow_rate_delta
        } else if wpm < c.mid_slow_wpm {
            c.mid_slow_rate_delta
        } else {
            0.0
        }
    }
}

impl Default for TimingAllocator {
    fn default() -> Self {
        Self::new()
    }
}
