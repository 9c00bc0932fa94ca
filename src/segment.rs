use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use serde::{Deserialize, Serialize};
use log::debug;

use crate::file_utils::FileManager;

// @module: Translated transcript segments and their ingestion

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: One timed unit of translated transcript text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    // @field: Translated text
    pub text: String,

    // @field: Approximate source start in seconds
    #[serde(default)]
    pub source_start: Option<f64>,

    // @field: Approximate source end in seconds
    #[serde(default)]
    pub source_end: Option<f64>,

    // @field: Original-language text, when the upstream translator provides it
    #[serde(default)]
    pub original_text: Option<String>,
}

impl Segment {
    /// Create a segment from translated text only
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            source_start: None,
            source_end: None,
            original_text: None,
        }
    }

    /// Create a segment with source timing
    pub fn with_timing<S: Into<String>>(text: S, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            source_start: Some(start),
            source_end: Some(end),
            original_text: None,
        }
    }

    /// Attach the original-language text
    pub fn with_original<S: Into<String>>(mut self, original: S) -> Self {
        self.original_text = Some(original.into());
        self
    }

    /// Trimmed character count, the weight used for slot allocation
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    /// Whitespace-separated word count
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source_start, self.source_end) {
            (Some(s), Some(e)) => write!(f, "[{:.3}-{:.3}] {}", s, e, self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// An ordered set of segments for one job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentCollection {
    /// Segments in source order
    pub segments: Vec<Segment>,
}

impl SegmentCollection {
    /// Wrap an existing segment list
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Load segments from a JSON file (array of segment objects)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let segments: Vec<Segment> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse segment file: {:?}", path.as_ref()))?;
        debug!("Loaded {} segments from {:?}", segments.len(), path.as_ref());
        Ok(Self { segments })
    }

    /// Load segments from an SRT file produced by the upstream translator
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let segments = Self::parse_srt(&content)?;
        if segments.is_empty() {
            return Err(anyhow!("No segments parsed from {:?}", path.as_ref()));
        }
        debug!("Parsed {} segments from {:?}", segments.len(), path.as_ref());
        Ok(Self { segments })
    }

    /// Parse SRT content into segments
    pub fn parse_srt(content: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();

        // SRT blocks are separated by blank lines: index, timestamps, text lines
        for block in content.replace("\r\n", "\n").split("\n\n") {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            let mut lines = block.lines();
            // First line is the sequence number; ignore it, order is positional
            let _seq = lines.next();

            let Some(ts_line) = lines.next() else { continue };
            let Some(caps) = TIMESTAMP_REGEX.captures(ts_line) else {
                continue;
            };

            let start = srt_caps_to_seconds(&caps, 1)?;
            let end = srt_caps_to_seconds(&caps, 5)?;

            let text = lines.collect::<Vec<_>>().join(" ").trim().to_string();
            if text.is_empty() {
                continue;
            }

            segments.push(Segment::with_timing(text, start, end));
        }

        Ok(segments)
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of trimmed character counts across all segments
    pub fn total_chars(&self) -> usize {
        self.segments.iter().map(|s| s.trimmed_len()).sum()
    }

    /// Total source duration when every segment carries timing
    pub fn source_duration(&self) -> Option<f64> {
        let first = self.segments.first()?.source_start?;
        let last = self.segments.last()?.source_end?;
        (last > first).then_some(last - first)
    }
}

fn srt_caps_to_seconds(caps: &regex::Captures<'_>, first_group: usize) -> Result<f64> {
    let h: f64 = caps[first_group].parse()?;
    let m: f64 = caps[first_group + 1].parse()?;
    let s: f64 = caps[first_group + 2].parse()?;
    let ms: f64 = caps[first_group + 3].parse()?;
    Ok(h * 3600.0 + m * 60.0 + s + ms / 1000.0)
}
