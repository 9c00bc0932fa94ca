/*!
 * Media-tool integrations: probing, time-stretching, concatenation and
 * silence generation, all behind one subprocess abstraction.
 */

pub mod tools;
pub mod toolkit;
pub mod stretch;
pub mod assembler;

pub use toolkit::{FfmpegToolkit, MediaToolkit};
pub use stretch::{CorrectionMode, DurationCorrector, StretchDecision};
pub use assembler::AudioAssembler;

use std::path::PathBuf;

/// One per-segment audio file, synthesized or silence, owned by the
/// pipeline run that created it
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    /// Location of the audio file on disk
    pub path: PathBuf,
    /// Whether this artifact is a silence fallback
    pub is_silence: bool,
    /// Duration the artifact is supposed to fill, in seconds
    pub expected_duration: f64,
    /// Probed duration, when a probe has run
    pub measured_duration: Option<f64>,
}

impl AudioArtifact {
    /// A synthesized artifact expected to fill the given slot
    pub fn synthesized(path: PathBuf, expected_duration: f64) -> Self {
        Self {
            path,
            is_silence: false,
            expected_duration,
            measured_duration: None,
        }
    }

    /// A silence-fallback artifact; silence is generated at exactly the
    /// slot duration so it is treated as already measured
    pub fn silence(path: PathBuf, duration: f64) -> Self {
        Self {
            path,
            is_silence: true,
            expected_duration: duration,
            measured_duration: Some(duration),
        }
    }
}
