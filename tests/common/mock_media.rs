/*!
 * Mock media toolkit for exercising the pipeline without ffmpeg.
 *
 * Records every call and writes small placeholder files, so assembly and
 * correction logic can be verified against the recorded call sequence.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use redub::errors::MediaError;
use redub::media::MediaToolkit;

/// One recorded toolkit invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitCall {
    Probe(PathBuf),
    Stretch {
        input: PathBuf,
        output: PathBuf,
        ratio: f64,
    },
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
    Silence {
        duration: f64,
        output: PathBuf,
    },
}

/// In-memory media toolkit with scriptable failures
#[derive(Debug, Default)]
pub struct MockToolkit {
    /// Every call made, in order
    calls: Mutex<Vec<ToolkitCall>>,
    /// Duration returned by every probe
    probe_duration: Mutex<f64>,
    /// Whether probe calls fail
    fail_probe: Mutex<bool>,
    /// Whether stretch calls fail
    fail_stretch: Mutex<bool>,
    /// Whether concat calls fail
    fail_concat: Mutex<bool>,
    /// Whether silence generation fails
    fail_silence: Mutex<bool>,
}

impl MockToolkit {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            probe_duration: Mutex::new(1.0),
            ..Default::default()
        })
    }

    /// Set the duration every probe reports
    pub fn set_probe_duration(&self, duration: f64) {
        *self.probe_duration.lock() = duration;
    }

    pub fn set_fail_probe(&self, fail: bool) {
        *self.fail_probe.lock() = fail;
    }

    pub fn set_fail_stretch(&self, fail: bool) {
        *self.fail_stretch.lock() = fail;
    }

    pub fn set_fail_concat(&self, fail: bool) {
        *self.fail_concat.lock() = fail;
    }

    pub fn set_fail_silence(&self, fail: bool) {
        *self.fail_silence.lock() = fail;
    }

    /// Snapshot of all recorded calls
    pub fn calls(&self) -> Vec<ToolkitCall> {
        self.calls.lock().clone()
    }

    /// Number of calls matching a predicate
    pub fn count_calls(&self, predicate: impl Fn(&ToolkitCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: ToolkitCall) {
        self.calls.lock().push(call);
    }

    fn write_placeholder(path: &Path) -> Result<(), MediaError> {
        std::fs::write(path, b"RIFF-mock-audio").map_err(|e| MediaError::ToolFailure {
            tool: "mock".to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MediaToolkit for MockToolkit {
    async fn probe_duration(&self, input: &Path) -> Result<f64, MediaError> {
        self.record(ToolkitCall::Probe(input.to_path_buf()));
        if *self.fail_probe.lock() {
            return Err(MediaError::UnparseableDuration("mock probe failure".to_string()));
        }
        Ok(*self.probe_duration.lock())
    }

    async fn time_stretch(
        &self,
        input: &Path,
        output: &Path,
        ratio: f64,
    ) -> Result<(), MediaError> {
        self.record(ToolkitCall::Stretch {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            ratio,
        });
        if *self.fail_stretch.lock() {
            return Err(MediaError::ToolFailure {
                tool: "ffmpeg".to_string(),
                message: "mock stretch failure".to_string(),
            });
        }
        Self::write_placeholder(output)
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError> {
        self.record(ToolkitCall::Concat {
            inputs: inputs.to_vec(),
            output: output.to_path_buf(),
        });
        if *self.fail_concat.lock() {
            return Err(MediaError::ToolFailure {
                tool: "ffmpeg".to_string(),
                message: "mock concat failure".to_string(),
            });
        }
        Self::write_placeholder(output)
    }

    async fn generate_silence(&self, duration: f64, output: &Path) -> Result<(), MediaError> {
        self.record(ToolkitCall::Silence {
            duration,
            output: output.to_path_buf(),
        });
        if *self.fail_silence.lock() {
            return Err(MediaError::ToolFailure {
                tool: "ffmpeg".to_string(),
                message: "mock silence failure".to_string(),
            });
        }
        Self::write_placeholder(output)
    }
}
