/*!
 * Error types for the redub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised when a translated segment set is rejected before synthesis
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Every segment carries the same text - the upstream translation failed
    #[error("All {count} segments contain identical text - translation output is degenerate")]
    IdenticalText {
        /// Number of segments in the rejected set
        count: usize,
    },

    /// Most segments still match their original-language text
    #[error("{untranslated} of {total} segments appear untranslated")]
    MostlyUntranslated {
        /// Segments whose text equals their original text
        untranslated: usize,
        /// Total segments checked
        total: usize,
    },

    /// The combined text contains no characters from the target language's script
    #[error("Translated text contains no {script} characters expected for language '{language}'")]
    WrongScript {
        /// Target language code
        language: String,
        /// Name of the expected script
        script: String,
    },

    /// The segment set is empty
    #[error("Segment set is empty")]
    EmptySegmentSet,
}

/// Errors that can occur when invoking a speech-synthesis engine
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The engine reported a hard failure
    #[error("Engine failure: {0}")]
    EngineFailure(String),

    /// The engine call exceeded its time budget
    #[error("Synthesis timed out after {0} seconds")]
    Timeout(u64),

    /// The engine produced a file too small to be usable audio
    #[error("Output file {path} is only {size} bytes - below the usable minimum")]
    OutputTooSmall {
        /// Path of the rejected file
        path: String,
        /// Actual file size in bytes
        size: u64,
    },

    /// The engine claimed success but no output file exists
    #[error("Engine reported success but produced no file at {0}")]
    MissingOutput(String),

    /// Error from the HTTP transport layer
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from the external media tools (probe, stretch, concat)
#[derive(Error, Debug)]
pub enum MediaError {
    /// A tool invocation failed or returned a non-zero status
    #[error("{tool} failed: {message}")]
    ToolFailure {
        /// Tool name (ffmpeg, ffprobe)
        tool: String,
        /// Filtered stderr or launch error
        message: String,
    },

    /// A tool invocation exceeded its timeout
    #[error("{tool} timed out after {seconds} seconds")]
    ToolTimeout {
        /// Tool name
        tool: String,
        /// Timeout that was exceeded
        seconds: u64,
    },

    /// Duration probe produced unparseable output
    #[error("Could not parse duration from probe output: {0}")]
    UnparseableDuration(String),

    /// Concatenation was asked to join an empty artifact list
    #[error("Cannot concatenate an empty artifact list")]
    EmptyConcatList,
}

/// Main pipeline error type that wraps all other errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Validation rejected the segment set - the only pre-synthesis abort
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from a synthesis engine
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from a media tool
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Every fallback was exhausted, including the silent-track fallback
    #[error("Pipeline exhausted all fallbacks: {0}")]
    Exhausted(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
