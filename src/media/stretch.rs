/*!
 * Post-hoc duration correction of synthesized artifacts.
 *
 * Synthesis output length is externally controlled and unpredictable; the
 * corrector measures the true duration and, when it deviates from the
 * allocated slot beyond tolerance, applies a constant-pitch time-stretch
 * at a clamped ratio. A failed stretch is a logged degradation, never an
 * abort.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::errors::MediaError;

use super::toolkit::MediaToolkit;
use super::AudioArtifact;

/// Which tolerance applies to a correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMode {
    /// One segment against its allocated slot (tight tolerance)
    Segment,
    /// The assembled track against the job's total duration
    FullTrack,
}

/// Outcome of the pure correction decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchDecision {
    /// Measured duration is close enough; leave the artifact alone
    WithinTolerance,
    /// Apply a stretch at this ratio (already clamped)
    Stretch(f64),
}

/// Decide whether a measured duration needs correcting.
///
/// Pure policy: tolerance comes from the mode, the ratio is
/// measured/target clamped to the configured bounds.
pub fn decide_stretch(
    measured: f64,
    target: f64,
    mode: CorrectionMode,
    config: &TimingConfig,
) -> StretchDecision {
    let tolerance = match mode {
        CorrectionMode::Segment => config.segment_tolerance,
        CorrectionMode::FullTrack => config.full_track_tolerance,
    };

    if target <= 0.0 || (measured - target).abs() <= tolerance {
        return StretchDecision::WithinTolerance;
    }

    let ratio = (measured / target)
        .clamp(config.min_stretch_ratio, config.max_stretch_ratio);

    StretchDecision::Stretch(ratio)
}

/// Corrects artifact durations via the media toolkit
pub struct DurationCorrector {
    toolkit: Arc<dyn MediaToolkit>,
    config: TimingConfig,
}

impl DurationCorrector {
    /// Create a corrector over the given toolkit and timing policy
    pub fn new(toolkit: Arc<dyn MediaToolkit>, config: TimingConfig) -> Self {
        Self { toolkit, config }
    }

    /// Measure the artifact and stretch it toward `target` if needed.
    ///
    /// Mutates the artifact file in place (the stretched file replaces the
    /// original at the same path). Silence artifacts are generated at
    /// exactly their slot duration and are skipped. Probe, stretch and
    /// file-swap failures leave the artifact uncorrected and return Ok.
    pub async fn correct(
        &self,
        artifact: &mut AudioArtifact,
        target: f64,
        mode: CorrectionMode,
    ) -> Result<(), MediaError> {
        if artifact.is_silence {
            return Ok(());
        }

        let measured = match self.toolkit.probe_duration(&artifact.path).await {
            Ok(d) => d,
            Err(e) => {
                warn!(
                    "Duration probe failed for {:?}, leaving uncorrected: {}",
                    artifact.path, e
                );
                return Ok(());
            }
        };
        artifact.measured_duration = Some(measured);

        match decide_stretch(measured, target, mode, &self.config) {
            StretchDecision::WithinTolerance => {
                debug!(
                    "{:?}: measured {:.3}s vs target {:.3}s, within tolerance",
                    artifact.path, measured, target
                );
                Ok(())
            }
            StretchDecision::Stretch(ratio) => {
                debug!(
                    "{:?}: measured {:.3}s vs target {:.3}s, stretching at {:.4}",
                    artifact.path, measured, target, ratio
                );

                let stretched = artifact.path.with_extension("stretched.wav");
                match self
                    .toolkit
                    .time_stretch(&artifact.path, &stretched, ratio)
                    .await
                {
                    Ok(()) => match std::fs::rename(&stretched, &artifact.path) {
                        Ok(()) => {
                            artifact.measured_duration = Some(measured / ratio);
                            Ok(())
                        }
                        Err(e) => {
                            // The original is still intact at the artifact
                            // path; drop the orphaned stretch output and
                            // keep going.
                            warn!(
                                "Could not swap stretched file into place for {:?}, keeping original duration: {}",
                                artifact.path, e
                            );
                            let _ = std::fs::remove_file(&stretched);
                            Ok(())
                        }
                    },
                    Err(e) => {
                        // Correction is attempted, not required: keep the
                        // original duration and move on.
                        warn!(
                            "Time-stretch failed for {:?}, keeping original duration: {}",
                            artifact.path, e
                        );
                        let _ = std::fs::remove_file(&stretched);
                        Ok(())
                    }
                }
            }
        }
    }
}
