/*!
 * Fixed contract for the external media collaborators.
 *
 * The pipeline only ever talks to probe/stretch/concat/silence through
 * the `MediaToolkit` trait; `FfmpegToolkit` is the production
 * implementation on top of ffmpeg and ffprobe.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::MediaError;

use super::tools::run_tool;

/// Sample rate of generated silence; matches the wav output requested
/// from the speech engines so stream-copy concat stays valid
pub const SILENCE_SAMPLE_RATE: u32 = 24_000;

/// Default bound on any single tool invocation
const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

/// Contract every media-tool collaborator must implement
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Measure a media file's duration in seconds at millisecond precision
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError>;

    /// Stretch audio playback time by `ratio` without changing pitch.
    /// A ratio above 1.0 shortens the output (plays faster).
    async fn time_stretch(
        &self,
        input: &Path,
        output: &Path,
        ratio: f64,
    ) -> Result<(), MediaError>;

    /// Losslessly concatenate ordered audio files into one output
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError>;

    /// Generate a silent audio file of the given duration
    async fn generate_silence(&self, duration: f64, output: &Path) -> Result<(), MediaError>;
}

/// ffmpeg/ffprobe-backed implementation of the media toolkit
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    tool_timeout: Duration,
}

impl FfmpegToolkit {
    /// Create a toolkit with the default per-invocation timeout
    pub fn new() -> Self {
        Self {
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Create a toolkit with a custom per-invocation timeout
    pub fn with_timeout(tool_timeout: Duration) -> Self {
        Self { tool_timeout }
    }

    async fn probe_with_entries(&self, path: &Path, entries: &str) -> Result<f64, MediaError> {
        let path_str = path.to_string_lossy();
        let output = run_tool(
            "ffprobe",
            &[
                "-v",
                "error",
                "-select_streams",
                "a:0",
                "-show_entries",
                entries,
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                &path_str,
            ],
            self.tool_timeout,
        )
        .await?;

        let raw = output.stdout.trim();
        raw.parse::<f64>()
            .map_err(|_| MediaError::UnparseableDuration(raw.to_string()))
    }
}

impl Default for FfmpegToolkit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        // Container-level duration first: it is what the muxer will see.
        match self.probe_with_entries(path, "format=duration").await {
            Ok(duration) => Ok(duration),
            Err(e) => {
                // Fallback query: stream-level duration of the first audio
                // stream, for containers that omit format duration.
                warn!(
                    "Container-level probe failed for {:?} ({}), trying stream-level",
                    path, e
                );
                self.probe_with_entries(path, "stream=duration").await
            }
        }
    }

    async fn time_stretch(
        &self,
        input: &Path,
        output: &Path,
        ratio: f64,
    ) -> Result<(), MediaError> {
        // atempo natively covers the clamped [0.5, 2.0] range
        let filter = format!("atempo={:.6}", ratio);
        let input_str = input.to_string_lossy();
        let output_str = output.to_string_lossy();

        debug!("Stretching {:?} with {}", input, filter);

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-i",
                &input_str,
                "-filter:a",
                &filter,
                &output_str,
            ],
            self.tool_timeout,
        )
        .await?;

        Ok(())
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError> {
        if inputs.is_empty() {
            return Err(MediaError::EmptyConcatList);
        }

        // ffmpeg concat demuxer needs a list file; quote per its own rules
        let list_path = output.with_extension("concat.txt");
        let list_content: String = inputs
            .iter()
            .map(|p| format!("file '{}'\n", p.to_string_lossy().replace('\'', r"'\''")))
            .collect();

        std::fs::write(&list_path, list_content).map_err(|e| MediaError::ToolFailure {
            tool: "ffmpeg".to_string(),
            message: format!("failed to write concat list: {}", e),
        })?;

        let list_str = list_path.to_string_lossy().to_string();
        let output_str = output.to_string_lossy().to_string();

        let result = run_tool(
            "ffmpeg",
            &[
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                &list_str,
                "-c",
                "copy",
                &output_str,
            ],
            self.tool_timeout,
        )
        .await;

        // The list file is scratch regardless of outcome
        let _ = std::fs::remove_file(&list_path);

        result.map(|_| ())
    }

    async fn generate_silence(&self, duration: f64, output: &Path) -> Result<(), MediaError> {
        let source = format!("anullsrc=r={}:cl=mono", SILENCE_SAMPLE_RATE);
        let duration_str = format!("{:.3}", duration);
        let output_str = output.to_string_lossy();

        debug!("Generating {:.3}s of silence at {:?}", duration, output);

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-f",
                "lavfi",
                "-i",
                &source,
                "-t",
                &duration_str,
                "-c:a",
                "pcm_s16le",
                &output_str,
            ],
            self.tool_timeout,
        )
        .await?;

        Ok(())
    }
}
