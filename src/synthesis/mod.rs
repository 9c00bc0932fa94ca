/*!
 * Speech synthesis engines and the retry/fallback wrapper around them.
 *
 * This module contains engine implementations behind a common trait:
 * - OpenAI: OpenAI-compatible HTTP speech endpoint
 * - Piper: local CLI synthesis
 * - Mock: deterministic in-process engine for tests and dry runs
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::app_config::{QualityTier, SynthesisConfig, VoiceProfile};
use crate::errors::SynthesisError;
use crate::file_utils::FileManager;
use crate::media::AudioArtifact;

pub mod openai;
pub mod piper;
pub mod mock;

/// One synthesis call: text, voice and delivery parameters
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,
    /// Voice identifier, meaningful to the engine
    pub voice: String,
    /// Relative speech-rate adjustment in percent (negative slows down)
    pub rate_delta: f32,
    /// Target language code
    pub language: String,
    /// Requested quality tier
    pub quality: QualityTier,
    /// Where the engine must write its audio output
    pub output_path: PathBuf,
}

/// Common trait for all speech-synthesis engines
///
/// The contract is "valid non-trivial audio file at the requested path, or
/// an explicit error" - nothing about engine internals is load-bearing.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Synthesize one request, writing audio to `request.output_path`
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError>;
}

/// Wraps an engine with the per-call timeout, output checks and the
/// alternate-voice retry policy
pub struct SpeechSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    config: SynthesisConfig,
}

impl SpeechSynthesizer {
    /// Create a synthesizer over the given engine
    pub fn new(engine: Arc<dyn SpeechEngine>, config: SynthesisConfig) -> Self {
        Self { engine, config }
    }

    /// Synthesize one segment into `output_path`.
    ///
    /// Tries the profile's primary voice, then retries once with the
    /// alternate voice before surfacing the error. Success requires the
    /// output file to exist and clear the minimum-size floor.
    pub async fn synthesize_segment(
        &self,
        text: &str,
        profile: &VoiceProfile,
        rate_delta: f32,
        expected_duration: f64,
        output_path: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        let primary = self.request_for(text, &profile.primary_voice, profile, rate_delta, output_path);

        match self.attempt(&primary).await {
            Ok(()) => Ok(AudioArtifact::synthesized(
                output_path.to_path_buf(),
                expected_duration,
            )),
            Err(primary_err) => {
                warn!(
                    "Voice '{}' failed ({}), retrying with alternate '{}'",
                    profile.primary_voice, primary_err, profile.alternate_voice
                );

                let alternate =
                    self.request_for(text, &profile.alternate_voice, profile, rate_delta, output_path);
                self.attempt(&alternate).await?;

                Ok(AudioArtifact::synthesized(
                    output_path.to_path_buf(),
                    expected_duration,
                ))
            }
        }
    }

    fn request_for(
        &self,
        text: &str,
        voice: &str,
        profile: &VoiceProfile,
        rate_delta: f32,
        output_path: &Path,
    ) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice: voice.to_string(),
            rate_delta,
            language: profile.language.clone(),
            quality: profile.quality,
            output_path: output_path.to_path_buf(),
        }
    }

    /// One bounded engine call plus output validation
    async fn attempt(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);

        debug!(
            "Synthesizing {} chars with {} voice '{}'",
            request.text.chars().count(),
            self.engine.name(),
            request.voice
        );

        match tokio::time::timeout(timeout, self.engine.synthesize(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(SynthesisError::Timeout(self.config.timeout_secs)),
        }

        // The engine must leave a real file behind before we report success
        if !FileManager::file_exists(&request.output_path) {
            return Err(SynthesisError::MissingOutput(
                request.output_path.to_string_lossy().to_string(),
            ));
        }

        let size = FileManager::file_size(&request.output_path)
            .map_err(|e| SynthesisError::EngineFailure(e.to_string()))?;
        if size < self.config.min_output_bytes {
            return Err(SynthesisError::OutputTooSmall {
                path: request.output_path.to_string_lossy().to_string(),
                size,
            });
        }

        Ok(())
    }
}
