/*!
 * Mock engine implementations for testing.
 *
 * This module provides mock engines that simulate different behaviors:
 * - `MockEngine::working()` - Always writes a valid audio payload
 * - `MockEngine::failing()` - Always fails with an error
 * - `MockEngine::failing_voices(...)` - Fails only for the named voices,
 *   which exercises the alternate-voice retry path
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::SynthesisError;

use super::{SpeechEngine, SynthesisRequest};

/// Default payload size; large enough to clear any sane minimum-size floor
const DEFAULT_PAYLOAD_BYTES: usize = 4096;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always writes a payload of the configured size
    Working,
    /// Always fails with an engine error
    Failing,
    /// Fails for the listed voices, succeeds for everything else
    FailingVoices(HashSet<String>),
    /// Writes a payload too small to pass output validation
    Undersized,
    /// Reports success without writing any file
    Phantom,
    /// Sleeps before answering (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock engine for testing synthesis and fallback behavior
#[derive(Debug)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of synthesize calls made so far
    call_count: Arc<AtomicUsize>,
    /// Payload size written on success
    payload_bytes: usize,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            payload_bytes: DEFAULT_PAYLOAD_BYTES,
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails only for the given voices
    pub fn failing_voices<I, S>(voices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = voices.into_iter().map(Into::into).collect();
        Self::new(MockBehavior::FailingVoices(set))
    }

    /// Create a mock whose output is below any reasonable size floor
    pub fn undersized() -> Self {
        Self::new(MockBehavior::Undersized)
    }

    /// Create a mock that claims success but writes nothing
    pub fn phantom() -> Self {
        Self::new(MockBehavior::Phantom)
    }

    /// Create a mock that delays before succeeding
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Override the payload size written on success
    pub fn with_payload_bytes(mut self, bytes: usize) -> Self {
        self.payload_bytes = bytes;
        self
    }

    /// Number of synthesize calls received
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn write_payload(&self, request: &SynthesisRequest, bytes: usize) -> Result<(), SynthesisError> {
        // RIFF magic up front so the file at least looks like audio
        let mut payload = b"RIFF".to_vec();
        payload.resize(bytes.max(4), 0u8);
        std::fs::write(&request.output_path, payload).map_err(|e| {
            SynthesisError::EngineFailure(format!(
                "failed to write mock audio to {:?}: {}",
                request.output_path, e
            ))
        })
    }
}

impl Clone for MockEngine {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            call_count: Arc::clone(&self.call_count),
            payload_bytes: self.payload_bytes,
        }
    }
}

#[async_trait]
impl SpeechEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => self.write_payload(request, self.payload_bytes),

            MockBehavior::Failing => Err(SynthesisError::EngineFailure(
                "simulated engine failure".to_string(),
            )),

            MockBehavior::FailingVoices(voices) => {
                if voices.contains(&request.voice) {
                    Err(SynthesisError::EngineFailure(format!(
                        "simulated failure for voice '{}'",
                        request.voice
                    )))
                } else {
                    self.write_payload(request, self.payload_bytes)
                }
            }

            MockBehavior::Undersized => self.write_payload(request, 8),

            MockBehavior::Phantom => Ok(()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                self.write_payload(request, self.payload_bytes)
            }
        }
    }
}
