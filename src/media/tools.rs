/*!
 * Single entry point for running external media tools.
 *
 * Every ffmpeg/ffprobe invocation in the crate goes through `run_tool`,
 * which bounds execution time, captures output, and maps failures into
 * `MediaError` instead of leaking raw process results.
 */

use std::time::Duration;

use log::{debug, error};
use tokio::process::Command;

use crate::errors::MediaError;

/// Maximum stderr characters carried into an error message
const MAX_STDERR_CHARS: usize = 2000;

/// Structured result of a successful tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr (ffmpeg writes its log here even on success)
    pub stderr: String,
}

/// Run an external tool with a timeout, returning its captured output.
///
/// A non-zero exit status becomes `MediaError::ToolFailure` with filtered
/// stderr; exceeding the timeout kills the child and becomes
/// `MediaError::ToolTimeout`.
pub async fn run_tool(
    tool: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<ToolOutput, MediaError> {
    debug!("Running {} {}", tool, args.join(" "));

    let output_future = Command::new(tool).args(args).kill_on_drop(true).output();

    let result = tokio::select! {
        result = output_future => {
            result.map_err(|e| MediaError::ToolFailure {
                tool: tool.to_string(),
                message: format!("failed to launch: {}", e),
            })?
        },
        _ = tokio::time::sleep(timeout) => {
            error!("{} timed out after {:?}", tool, timeout);
            return Err(MediaError::ToolTimeout {
                tool: tool.to_string(),
                seconds: timeout.as_secs(),
            });
        }
    };

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    let stderr = String::from_utf8_lossy(&result.stderr).to_string();

    if !result.status.success() {
        let filtered = filter_tool_stderr(&stderr);
        error!("{} exited with {}: {}", tool, result.status, filtered);
        return Err(MediaError::ToolFailure {
            tool: tool.to_string(),
            message: filtered,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

/// Reduce tool stderr to the lines that matter for an error message.
///
/// ffmpeg prefixes its output with a configuration/banner dump; keep only
/// lines that look like errors, bounded in size.
pub fn filter_tool_stderr(stderr: &str) -> String {
    let interesting: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("error")
                || lower.contains("invalid")
                || lower.contains("no such file")
                || lower.contains("not found")
                || lower.contains("permission denied")
        })
        .collect();

    let summary = if interesting.is_empty() {
        stderr.lines().last().unwrap_or("").to_string()
    } else {
        interesting.join("; ")
    };

    summary.chars().take(MAX_STDERR_CHARS).collect()
}
