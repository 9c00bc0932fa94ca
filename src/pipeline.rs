/*!
 * Pipeline orchestrator for assembling a dubbed audio track.
 *
 * The orchestrator runs the four-phase dubbing pipeline:
 * 1. Validation: reject degenerate translation output
 * 2. Allocation: carve the total duration into per-segment slots
 * 3. Synthesis: speak each segment concurrently, silence on failure
 * 4. Assembly: duration-correct and concatenate into one track
 *
 * The only abort before an output track exists is validation failure.
 * Past that point every per-segment failure degrades to silence, and a
 * whole-pipeline failure degrades to a silent track of the full duration.
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use log::{error, info, warn};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::app_config::{Config, SynthesisEngine};
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::media::{
    AudioArtifact, AudioAssembler, CorrectionMode, DurationCorrector, FfmpegToolkit, MediaToolkit,
};
use crate::segment::SegmentCollection;
use crate::synthesis::mock::MockEngine;
use crate::synthesis::openai::OpenAiEngine;
use crate::synthesis::piper::PiperEngine;
use crate::synthesis::{SpeechEngine, SpeechSynthesizer};
use crate::timing::{SegmentTiming, TimingAllocator};
use crate::validation::{TranslationValidator, ValidationOutcome};

/// Phases of the dubbing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Checking the translated segment set
    Validating,
    /// Carving the total duration into slots
    Allocating,
    /// Speaking segments and correcting their durations
    Synthesizing,
    /// Concatenating artifacts into the output track
    Assembling,
    /// Output track written
    Done,
    /// Terminal failure (validation rejected the input)
    Error,
}

/// Progress information during pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineProgress {
    /// Current phase
    pub phase: PipelinePhase,

    /// Segments finished so far (synthesis phase only)
    pub segments_done: usize,

    /// Total segments in the job
    pub total_segments: usize,

    /// Current status message
    pub status: String,
}

impl PipelineProgress {
    /// Create a new progress indicator at the start of a phase.
    pub fn new(phase: PipelinePhase, total_segments: usize) -> Self {
        Self {
            phase,
            segments_done: 0,
            total_segments,
            status: String::new(),
        }
    }

    /// Overall progress estimate in [0.0, 1.0].
    ///
    /// Synthesis dominates wall-clock time, so it owns most of the range.
    pub fn overall(&self) -> f32 {
        let phase_fraction = if self.total_segments == 0 {
            0.0
        } else {
            self.segments_done as f32 / self.total_segments as f32
        };

        match self.phase {
            PipelinePhase::Validating => 0.0,
            PipelinePhase::Allocating => 0.05,
            PipelinePhase::Synthesizing => 0.1 + phase_fraction * 0.8,
            PipelinePhase::Assembling => 0.9,
            PipelinePhase::Done => 1.0,
            PipelinePhase::Error => 1.0,
        }
    }
}

/// Callback invoked as the pipeline moves through its phases
pub type ProgressCallback = Box<dyn Fn(PipelineProgress) + Send + Sync>;

/// Result of a complete pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Unique id of this job; temp artifacts were keyed by it
    pub job_id: String,

    /// Path of the assembled output track
    pub output_path: PathBuf,

    /// Total track duration in seconds
    pub total_duration: f64,

    /// Segments in the job
    pub total_segments: usize,

    /// Segments that fell back to silence
    pub silence_segments: usize,

    /// Whether the whole track is the silent fallback
    pub silent_track_fallback: bool,

    /// Validation outcome for the input segment set
    pub validation: ValidationOutcome,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl PipelineResult {
    /// One-line summary for logs and CLI output.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("Track: {:?} ({:.1}s)", self.output_path, self.total_duration),
            format!(
                "Segments: {} ({} silence)",
                self.total_segments, self.silence_segments
            ),
            format!("Elapsed: {:.2}s", self.elapsed.as_secs_f32()),
        ];

        if self.silent_track_fallback {
            parts.push("Silent-track fallback".to_string());
        }

        parts.join(" | ")
    }
}

/// The main dubbing pipeline orchestrator.
pub struct DubbingPipeline {
    config: Config,
    validator: TranslationValidator,
    allocator: TimingAllocator,
    synthesizer: Arc<SpeechSynthesizer>,
    corrector: Arc<DurationCorrector>,
    assembler: AudioAssembler,
    toolkit: Arc<dyn MediaToolkit>,
}

impl DubbingPipeline {
    /// Create a pipeline over explicit engine and toolkit implementations.
    pub fn new(config: Config, engine: Arc<dyn SpeechEngine>, toolkit: Arc<dyn MediaToolkit>) -> Self {
        let validator = TranslationValidator::with_config(config.validation.clone());
        let allocator = TimingAllocator::with_config(config.timing.clone());
        let synthesizer = Arc::new(SpeechSynthesizer::new(engine, config.synthesis.clone()));
        let corrector = Arc::new(DurationCorrector::new(
            Arc::clone(&toolkit),
            config.timing.clone(),
        ));
        let assembler = AudioAssembler::new(Arc::clone(&toolkit));

        Self {
            config,
            validator,
            allocator,
            synthesizer,
            corrector,
            assembler,
            toolkit,
        }
    }

    /// Create a pipeline from configuration, selecting the engine it names
    /// and the real ffmpeg toolkit.
    pub fn from_config(config: Config) -> Self {
        let timeout = Duration::from_secs(config.synthesis.timeout_secs);

        let engine: Arc<dyn SpeechEngine> = match config.synthesis.engine {
            SynthesisEngine::OpenAI => Arc::new(OpenAiEngine::new(
                config.synthesis.endpoint.clone(),
                config.synthesis.api_key.clone(),
                config.synthesis.model.clone(),
                timeout,
            )),
            SynthesisEngine::Piper => Arc::new(PiperEngine::new(
                config.synthesis.piper_binary.clone(),
                config.synthesis.piper_model_dir.clone(),
                timeout,
            )),
            SynthesisEngine::Mock => Arc::new(MockEngine::working()),
        };

        let toolkit: Arc<dyn MediaToolkit> = Arc::new(FfmpegToolkit::new());
        Self::new(config, engine, toolkit)
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline on a segment collection.
    ///
    /// `total_duration` is the known length of the source track in
    /// seconds. Temp artifacts are cleaned up on every exit path.
    pub async fn run(
        &self,
        collection: &SegmentCollection,
        total_duration: f64,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();
        let job_id = Uuid::new_v4().simple().to_string();
        let total_segments = collection.len();

        info!(
            "Starting dubbing job {} ({} segments, {:.1}s)",
            job_id, total_segments, total_duration
        );

        FileManager::ensure_dir(&self.config.temp_dir)?;
        FileManager::ensure_dir(&self.config.output_dir)?;

        let report = |phase: PipelinePhase, done: usize, status: &str| {
            if let Some(ref callback) = progress_callback {
                let mut progress = PipelineProgress::new(phase, total_segments);
                progress.segments_done = done;
                progress.status = status.to_string();
                callback(progress);
            }
        };

        // Phase 1: Validation. This is the one gate that can still refuse
        // the job outright.
        report(PipelinePhase::Validating, 0, "Validating segments...");
        let validation = match self
            .validator
            .validate(&collection.segments, &self.config.target_language)
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Job {} rejected by validation: {}", job_id, e);
                report(PipelinePhase::Error, 0, &e.to_string());
                return Err(e.into());
            }
        };
        for warning in &validation.warnings {
            warn!("Job {}: {}", job_id, warning);
        }

        // Phase 2: Allocation
        report(PipelinePhase::Allocating, 0, "Allocating time slots...");
        let timings = self.allocator.allocate(&collection.segments, total_duration);

        // Phase 3: Synthesis
        report(PipelinePhase::Synthesizing, 0, "Synthesizing segments...");
        let output_path = FileManager::output_track_path(&self.config.output_dir, &job_id);

        let result = self
            .synthesize_and_assemble(collection, &timings, &job_id, &output_path, &report)
            .await;

        let run_result = match result {
            Ok(silence_segments) => {
                report(PipelinePhase::Done, total_segments, "Track assembled");
                Ok(PipelineResult {
                    job_id: job_id.clone(),
                    output_path: output_path.clone(),
                    total_duration,
                    total_segments,
                    silence_segments,
                    silent_track_fallback: false,
                    validation: validation.clone(),
                    elapsed: start_time.elapsed(),
                })
            }
            Err(e) => {
                // A duration estimate exists, so a track can always be
                // produced. Only a failed silent fallback is terminal.
                warn!(
                    "Job {} failed ({}), falling back to a silent track",
                    job_id, e
                );
                match self.assembler.silent_track(total_duration, &output_path).await {
                    Ok(()) => {
                        report(PipelinePhase::Done, total_segments, "Silent fallback track");
                        Ok(PipelineResult {
                            job_id: job_id.clone(),
                            output_path: output_path.clone(),
                            total_duration,
                            total_segments,
                            silence_segments: total_segments,
                            silent_track_fallback: true,
                            validation: validation.clone(),
                            elapsed: start_time.elapsed(),
                        })
                    }
                    Err(fallback_err) => Err(PipelineError::Exhausted(format!(
                        "{}; silent fallback also failed: {}",
                        e, fallback_err
                    ))),
                }
            }
        };

        let removed = FileManager::cleanup_job_files(&self.config.temp_dir, &job_id);
        info!("Job {} finished, removed {} temp files", job_id, removed);

        run_result
    }

    /// Synthesize all segments concurrently, correct their durations and
    /// concatenate them. Returns the number of silence fallbacks.
    async fn synthesize_and_assemble(
        &self,
        collection: &SegmentCollection,
        timings: &[SegmentTiming],
        job_id: &str,
        output_path: &std::path::Path,
        report: &impl Fn(PipelinePhase, usize, &str),
    ) -> Result<usize, PipelineError> {
        let profile = self.config.voice_for(&self.config.target_language);
        let semaphore = Arc::new(Semaphore::new(self.config.synthesis.concurrent_segments));
        let completed = Arc::new(AtomicUsize::new(0));
        let total_segments = collection.len();

        let results = stream::iter(collection.segments.iter().zip(timings.iter()))
            .map(|(segment, timing)| {
                let semaphore = Arc::clone(&semaphore);
                let completed = Arc::clone(&completed);
                let synthesizer = Arc::clone(&self.synthesizer);
                let corrector = Arc::clone(&self.corrector);
                let toolkit = Arc::clone(&self.toolkit);
                let profile = profile.clone();
                let artifact_path = FileManager::segment_artifact_path(
                    &self.config.temp_dir,
                    job_id,
                    timing.index,
                );

                async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return (
                                timing.index,
                                Err(PipelineError::File("semaphore closed".to_string())),
                            );
                        }
                    };

                    let mut artifact = match synthesizer
                        .synthesize_segment(
                            &segment.text,
                            &profile,
                            timing.speech_rate,
                            timing.duration,
                            &artifact_path,
                        )
                        .await
                    {
                        Ok(artifact) => artifact,
                        Err(e) => {
                            // Both voices failed; the slot still has to be
                            // filled, so it becomes silence.
                            warn!(
                                "Segment {} failed after retry ({}), using silence",
                                timing.index, e
                            );
                            match toolkit
                                .generate_silence(timing.duration, &artifact_path)
                                .await
                            {
                                Ok(()) => AudioArtifact::silence(artifact_path, timing.duration),
                                Err(media_err) => {
                                    return (timing.index, Err(media_err.into()));
                                }
                            }
                        }
                    };

                    if let Err(e) = corrector
                        .correct(&mut artifact, timing.duration, CorrectionMode::Segment)
                        .await
                    {
                        return (timing.index, Err(e.into()));
                    }

                    completed.fetch_add(1, Ordering::SeqCst);
                    (timing.index, Ok(artifact))
                }
            })
            .buffer_unordered(self.config.synthesis.concurrent_segments)
            .collect::<Vec<_>>()
            .await;

        report(
            PipelinePhase::Synthesizing,
            completed.load(Ordering::SeqCst),
            "Synthesis complete",
        );

        // Track order is segment order: sort by index before concatenation
        let mut sorted = results;
        sorted.sort_by_key(|(index, _)| *index);

        let mut artifacts = Vec::with_capacity(sorted.len());
        for (index, result) in sorted {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    return Err(PipelineError::File(format!(
                        "segment {} could not be produced: {}",
                        index, e
                    )));
                }
            }
        }

        let silence_segments = artifacts.iter().filter(|a| a.is_silence).count();
        if silence_segments > 0 {
            warn!(
                "{} of {} segments fell back to silence",
                silence_segments, total_segments
            );
        }

        // Phase 4: Assembly, then one full-track correction pass against
        // the looser whole-job tolerance.
        report(PipelinePhase::Assembling, total_segments, "Assembling track...");
        self.assembler.assemble(&artifacts, output_path).await?;

        let total_duration: f64 = timings.iter().map(|t| t.duration).sum();
        let mut track = AudioArtifact::synthesized(output_path.to_path_buf(), total_duration);
        self.corrector
            .correct(&mut track, total_duration, CorrectionMode::FullTrack)
            .await?;

        Ok(silence_segments)
    }
}
