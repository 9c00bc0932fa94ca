/*!
 * # redub - Segment-synchronized speech assembly
 *
 * A Rust library for assembling dubbed audio tracks from translated
 * segment sets.
 *
 * ## Features
 *
 * - Reject degenerate translation output before any synthesis cost
 * - Allocate per-segment time slots that sum exactly to the track length
 * - Synthesize speech through pluggable engines (OpenAI-compatible HTTP,
 *   local Piper, offline mock)
 * - Alternate-voice retry and silence fallback for failed segments
 * - Constant-pitch duration correction against allocated slots
 * - Lossless concatenation into one continuous track
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segment`: Translated segment ingestion (JSON and SRT)
 * - `validation`: Degenerate-output heuristics over segment sets
 * - `timing`: Proportional time-slot allocation
 * - `synthesis`: Speech engines behind a common trait:
 *   - `synthesis::openai`: OpenAI-compatible HTTP endpoint
 *   - `synthesis::piper`: Local Piper CLI
 *   - `synthesis::mock`: Deterministic engine for tests and dry runs
 * - `media`: ffmpeg/ffprobe integrations (probe, stretch, concat, silence)
 * - `pipeline`: The dubbing orchestrator
 * - `file_utils`: File system operations and job-scoped artifact layout
 * - `language_utils`: ISO language code and script utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod pipeline;
pub mod segment;
pub mod synthesis;
pub mod timing;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{Config, SynthesisEngine, VoiceProfile};
pub use errors::{MediaError, PipelineError, SynthesisError, ValidationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use media::{AudioArtifact, AudioAssembler, DurationCorrector, FfmpegToolkit, MediaToolkit};
pub use pipeline::{DubbingPipeline, PipelinePhase, PipelineProgress, PipelineResult};
pub use segment::{Segment, SegmentCollection};
pub use synthesis::{SpeechEngine, SpeechSynthesizer};
pub use timing::{SegmentTiming, TimingAllocator};
pub use validation::{TranslationValidator, ValidationOutcome};
