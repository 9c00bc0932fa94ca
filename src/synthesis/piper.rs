use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::SynthesisError;

use super::{SpeechEngine, SynthesisRequest};

/// Local Piper TTS engine driven over stdin
pub struct PiperEngine {
    /// Path to the piper binary
    binary: String,
    /// Directory holding voice models; the voice id names the model file
    model_dir: PathBuf,
    /// Bound on one piper run (the synthesizer enforces its own on top)
    timeout: Duration,
}

impl PiperEngine {
    /// Create a new piper engine
    pub fn new(binary: impl Into<String>, model_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            model_dir: model_dir.into(),
            timeout,
        }
    }

    /// Model file for a voice id
    fn model_path(&self, voice: &str) -> PathBuf {
        self.model_dir.join(format!("{}.onnx", voice))
    }

    /// Piper expresses pace as a length scale: >1.0 slows speech down
    fn length_scale(rate_delta: f32) -> f32 {
        let speed = (1.0 + rate_delta / 100.0).clamp(0.25, 4.0);
        1.0 / speed
    }
}

#[async_trait]
impl SpeechEngine for PiperEngine {
    fn name(&self) -> &str {
        "piper"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        let model = self.model_path(&request.voice);
        if !model.exists() {
            return Err(SynthesisError::EngineFailure(format!(
                "voice model not found: {:?}",
                model
            )));
        }

        let length_scale = Self::length_scale(request.rate_delta);
        debug!(
            "piper voice={} length_scale={:.3} -> {:?}",
            request.voice, length_scale, request.output_path
        );

        let mut child = Command::new(&self.binary)
            .arg("--model")
            .arg(&model)
            .arg("--length_scale")
            .arg(format!("{:.3}", length_scale))
            .arg("--output_file")
            .arg(&request.output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SynthesisError::EngineFailure(format!("failed to launch piper: {}", e)))?;

        // Text goes in over stdin, one utterance per run
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request.text.as_bytes())
                .await
                .map_err(|e| SynthesisError::EngineFailure(format!("stdin write failed: {}", e)))?;
            drop(stdin);
        }

        let output = tokio::select! {
            result = child.wait_with_output() => {
                result.map_err(|e| SynthesisError::EngineFailure(format!("piper wait failed: {}", e)))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(SynthesisError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("piper exited with {}: {}", output.status, stderr.trim());
            return Err(SynthesisError::EngineFailure(format!(
                "piper exited with {}",
                output.status
            )));
        }

        Ok(())
    }
}
