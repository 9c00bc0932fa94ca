/*!
 * Assembly of per-segment artifacts into the final track.
 *
 * Concatenation is stream-copy only: re-encoding at this stage would both
 * lose quality and re-introduce the duration drift the corrector just
 * removed.
 */

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::errors::MediaError;
use crate::file_utils::FileManager;

use super::toolkit::MediaToolkit;
use super::AudioArtifact;

/// Concatenates ordered artifacts into one continuous track
pub struct AudioAssembler {
    toolkit: Arc<dyn MediaToolkit>,
}

impl AudioAssembler {
    /// Create an assembler over the given toolkit
    pub fn new(toolkit: Arc<dyn MediaToolkit>) -> Self {
        Self { toolkit }
    }

    /// Concatenate artifacts in order into `output`.
    ///
    /// Fails with `MediaError::EmptyConcatList` for an empty input; a
    /// single artifact is copied directly.
    pub async fn assemble(
        &self,
        artifacts: &[AudioArtifact],
        output: &Path,
    ) -> Result<(), MediaError> {
        match artifacts {
            [] => Err(MediaError::EmptyConcatList),
            [only] => {
                debug!("Single artifact, copying {:?} to {:?}", only.path, output);
                FileManager::copy_file(&only.path, output).map_err(|e| {
                    MediaError::ToolFailure {
                        tool: "copy".to_string(),
                        message: e.to_string(),
                    }
                })
            }
            _ => {
                let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
                let silence_count = artifacts.iter().filter(|a| a.is_silence).count();
                info!(
                    "Concatenating {} artifacts ({} silence) into {:?}",
                    artifacts.len(),
                    silence_count,
                    output
                );
                self.toolkit.concat(&paths, output).await
            }
        }
    }

    /// Emit a silent track of the given duration at `output`.
    ///
    /// This is the guaranteed fallback: once an overall duration estimate
    /// exists, callers always receive a track.
    pub async fn silent_track(&self, duration: f64, output: &Path) -> Result<(), MediaError> {
        info!("Emitting silent fallback track of {:.3}s at {:?}", duration, output);
        self.toolkit.generate_silence(duration, output).await
    }
}
