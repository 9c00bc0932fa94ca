use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::file_utils::FileManager;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO)
    pub target_language: String,

    /// Synthesis config
    pub synthesis: SynthesisConfig,

    /// Timing allocation and correction config
    #[serde(default)]
    pub timing: TimingConfig,

    /// Translation validation config
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Voice profiles keyed by language code
    #[serde(default)]
    pub voices: Vec<VoiceProfile>,

    /// Directory for final output tracks
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory for per-segment temporary artifacts
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech synthesis engine type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisEngine {
    // @engine: OpenAI-compatible HTTP speech endpoint
    #[default]
    OpenAI,
    // @engine: Piper (local CLI)
    Piper,
    // @engine: Mock (offline dry runs and tests)
    Mock,
}

impl SynthesisEngine {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Piper => "Piper",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Piper => "piper".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for SynthesisEngine
impl std::fmt::Display for SynthesisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for SynthesisEngine
impl std::str::FromStr for SynthesisEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "piper" => Ok(Self::Piper),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Engine to use
    #[serde(default)]
    pub engine: SynthesisEngine,

    /// Model name for the HTTP engine (e.g., "tts-1", "tts-1-hd")
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the HTTP engine
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL for the HTTP engine
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Path to the piper binary
    #[serde(default = "default_piper_binary")]
    pub piper_binary: String,

    /// Directory holding piper voice models
    #[serde(default = "String::new")]
    pub piper_model_dir: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max segments synthesized concurrently
    #[serde(default = "default_concurrent_segments")]
    pub concurrent_segments: usize,

    /// Minimum usable output size in bytes
    #[serde(default = "default_min_output_bytes")]
    pub min_output_bytes: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            engine: SynthesisEngine::default(),
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            piper_binary: default_piper_binary(),
            piper_model_dir: String::new(),
            timeout_secs: default_timeout_secs(),
            concurrent_segments: default_concurrent_segments(),
            min_output_bytes: default_min_output_bytes(),
        }
    }
}

/// Timing allocation and duration correction configuration
///
/// The words-per-minute cutoffs and rate deltas are empirically chosen
/// policy values carried here so they can be tuned without touching the
/// allocator.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingConfig {
    /// Minimum slot duration per segment in seconds
    #[serde(default = "default_min_segment_duration")]
    pub min_segment_duration: f64,

    /// Allowed deviation between slot sum and total duration, in seconds
    #[serde(default = "default_sum_tolerance")]
    pub sum_tolerance: f64,

    /// Correction tolerance for a single segment, in seconds
    #[serde(default = "default_segment_tolerance")]
    pub segment_tolerance: f64,

    /// Correction tolerance for the assembled track, in seconds
    #[serde(default = "default_full_track_tolerance")]
    pub full_track_tolerance: f64,

    /// Lower clamp for the time-stretch ratio
    #[serde(default = "default_min_stretch_ratio")]
    pub min_stretch_ratio: f64,

    /// Upper clamp for the time-stretch ratio
    #[serde(default = "default_max_stretch_ratio")]
    pub max_stretch_ratio: f64,

    /// WPM above which the strongest rate adjustment applies
    #[serde(default = "default_fast_wpm")]
    pub fast_wpm: f64,

    /// WPM above which a mild rate adjustment applies
    #[serde(default = "default_mid_fast_wpm")]
    pub mid_fast_wpm: f64,

    /// WPM below which a mild rate adjustment applies
    #[serde(default = "default_mid_slow_wpm")]
    pub mid_slow_wpm: f64,

    /// WPM below which the strongest rate adjustment applies
    #[serde(default = "default_slow_wpm")]
    pub slow_wpm: f64,

    /// Rate delta (percent) for segments above fast_wpm
    #[serde(default = "default_fast_rate_delta")]
    pub fast_rate_delta: f32,

    /// Rate delta (percent) for segments above mid_fast_wpm
    #[serde(default = "default_mid_fast_rate_delta")]
    pub mid_fast_rate_delta: f32,

    /// Rate delta (percent) for segments below mid_slow_wpm
    #[serde(default = "default_mid_slow_rate_delta")]
    pub mid_slow_rate_delta: f32,

    /// Rate delta (percent) for segments below slow_wpm
    #[serde(default = "default_slow_rate_delta")]
    pub slow_rate_delta: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_segment_duration: default_min_segment_duration(),
            sum_tolerance: default_sum_tolerance(),
            segment_tolerance: default_segment_tolerance(),
            full_track_tolerance: default_full_track_tolerance(),
            min_stretch_ratio: default_min_stretch_ratio(),
            max_stretch_ratio: default_max_stretch_ratio(),
            fast_wpm: default_fast_wpm(),
            mid_fast_wpm: default_mid_fast_wpm(),
            mid_slow_wpm: default_mid_slow_wpm(),
            slow_wpm: default_slow_wpm(),
            fast_rate_delta: default_fast_rate_delta(),
            mid_fast_rate_delta: default_mid_fast_rate_delta(),
            mid_slow_rate_delta: default_mid_slow_rate_delta(),
            slow_rate_delta: default_slow_rate_delta(),
        }
    }
}

/// Translation validation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Whether validation is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fraction of untranslated segments above which the job is rejected
    #[serde(default = "default_untranslated_threshold")]
    pub untranslated_threshold: f64,

    /// Unique-text ratio below which a low-variety warning is emitted
    #[serde(default = "default_low_variety_ratio")]
    pub low_variety_ratio: f64,

    /// Minimum segment count for the low-variety check to apply
    #[serde(default = "default_low_variety_min_segments")]
    pub low_variety_min_segments: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            untranslated_threshold: default_untranslated_threshold(),
            low_variety_ratio: default_low_variety_ratio(),
            low_variety_min_segments: default_low_variety_min_segments(),
        }
    }
}

/// Voice quality tier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Standard,
    High,
}

/// Static voice configuration for one target language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// The language code this profile applies to (ISO 639-1 or 639-2)
    pub language: String,
    /// Voice identifier used on the first attempt
    pub primary_voice: String,
    /// Voice identifier used for the single retry
    pub alternate_voice: String,
    /// Quality tier requested from the engine
    #[serde(default)]
    pub quality: QualityTier,
}

impl VoiceProfile {
    /// Built-in fallback profile used when no configured profile matches
    pub fn fallback(language: &str) -> Self {
        Self {
            language: language.to_string(),
            primary_voice: "alloy".to_string(),
            alternate_voice: "onyx".to_string(),
            quality: QualityTier::Standard,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_temp_dir() -> String {
    "tmp".to_string()
}

fn default_model() -> String {
    "tts-1".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_piper_binary() -> String {
    "piper".to_string()
}

fn default_timeout_secs() -> u64 {
    120 // 2 minute bound on any single engine call
}

fn default_concurrent_segments() -> usize {
    4
}

fn default_min_output_bytes() -> u64 {
    1000
}

fn default_min_segment_duration() -> f64 {
    0.5
}

fn default_sum_tolerance() -> f64 {
    0.010
}

fn default_segment_tolerance() -> f64 {
    0.1
}

fn default_full_track_tolerance() -> f64 {
    0.5
}

fn default_min_stretch_ratio() -> f64 {
    0.5
}

fn default_max_stretch_ratio() -> f64 {
    2.0
}

fn default_fast_wpm() -> f64 {
    180.0
}

fn default_mid_fast_wpm() -> f64 {
    150.0
}

fn default_mid_slow_wpm() -> f64 {
    100.0
}

fn default_slow_wpm() -> f64 {
    80.0
}

fn default_fast_rate_delta() -> f32 {
    -20.0
}

fn default_mid_fast_rate_delta() -> f32 {
    -10.0
}

fn default_mid_slow_rate_delta() -> f32 {
    10.0
}

fn default_slow_rate_delta() -> f32 {
    20.0
}

fn default_untranslated_threshold() -> f64 {
    0.75
}

fn default_low_variety_ratio() -> f64 {
    0.30
}

fn default_low_variety_min_segments() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate target language
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        // Validate API key for the HTTP engine
        if self.synthesis.engine == SynthesisEngine::OpenAI && self.synthesis.api_key.is_empty() {
            return Err(anyhow!("Synthesis API key is required for the OpenAI engine"));
        }

        if self.timing.min_stretch_ratio >= self.timing.max_stretch_ratio {
            return Err(anyhow!(
                "Invalid stretch ratio bounds: {} >= {}",
                self.timing.min_stretch_ratio,
                self.timing.max_stretch_ratio
            ));
        }

        if self.synthesis.concurrent_segments == 0 {
            return Err(anyhow!("concurrent_segments must be at least 1"));
        }

        Ok(())
    }

    /// Look up the voice profile for a language, falling back to built-in defaults
    pub fn voice_for(&self, language: &str) -> VoiceProfile {
        self.voices
            .iter()
            .find(|v| crate::language_utils::language_codes_match(&v.language, language))
            .cloned()
            .unwrap_or_else(|| VoiceProfile::fallback(language))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: "fr".to_string(),
            synthesis: SynthesisConfig::default(),
            timing: TimingConfig::default(),
            validation: ValidationConfig::default(),
            voices: Vec::new(),
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            log_level: LogLevel::default(),
        }
    }
}
