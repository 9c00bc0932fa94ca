use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::{debug, error};

use crate::app_config::QualityTier;
use crate::errors::SynthesisError;

use super::{SpeechEngine, SynthesisRequest};

/// Client for an OpenAI-compatible speech endpoint
pub struct OpenAiEngine {
    /// Base URL of the API (e.g., https://api.openai.com/v1)
    base_url: String,
    /// API key sent as a bearer token
    api_key: String,
    /// Model used for standard-quality requests
    model: String,
    /// HTTP client for making requests
    client: Client,
}

/// Speech request body for the /audio/speech endpoint
#[derive(Debug, Serialize)]
struct SpeechRequestBody {
    /// Model name
    model: String,
    /// Text to speak
    input: String,
    /// Voice identifier
    voice: String,
    /// Playback speed multiplier (1.0 = normal)
    speed: f32,
    /// Output container; wav keeps downstream concat lossless
    response_format: String,
}

/// Error payload the endpoint returns on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiEngine {
    /// Create a new engine client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Model for a given quality tier; the hd variant only exists for tts-1
    fn model_for(&self, quality: QualityTier) -> String {
        match quality {
            QualityTier::High if self.model == "tts-1" => "tts-1-hd".to_string(),
            _ => self.model.clone(),
        }
    }

    /// Map a rate delta in percent onto the endpoint's speed multiplier
    fn speed_for(rate_delta: f32) -> f32 {
        (1.0 + rate_delta / 100.0).clamp(0.25, 4.0)
    }
}

#[async_trait]
impl SpeechEngine for OpenAiEngine {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        let url = format!("{}/audio/speech", self.base_url);
        let body = SpeechRequestBody {
            model: self.model_for(request.quality),
            input: request.text.clone(),
            voice: request.voice.clone(),
            speed: Self::speed_for(request.rate_delta),
            response_format: "wav".to_string(),
        };

        debug!(
            "POST {} voice={} speed={:.2}",
            url, body.voice, body.speed
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(text);
            error!("Speech endpoint returned {}: {}", status, message);
            return Err(SynthesisError::EngineFailure(format!(
                "{} - {}",
                status, message
            )));
        }

        let audio = response.bytes().await?;
        std::fs::write(&request.output_path, &audio).map_err(|e| {
            SynthesisError::EngineFailure(format!(
                "failed to write audio to {:?}: {}",
                request.output_path, e
            ))
        })?;

        Ok(())
    }
}
