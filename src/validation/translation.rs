/*!
 * Quality validation of upstream translation output.
 *
 * Rejects segment sets that are degenerate before any synthesis cost is
 * incurred: all-identical text, mostly-untranslated content, or text in
 * the wrong script for the target language. A low-variety segment set is
 * only warned about; it is degraded quality, not proven breakage.
 */

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::ValidationConfig;
use crate::errors::ValidationError;
use crate::language_utils;
use crate::segment::Segment;

/// Summary of a validation run, produced once and consumed to decide
/// abort vs proceed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the segment set may proceed to synthesis
    pub is_valid: bool,
    /// Total segments checked
    pub total_segments: usize,
    /// Distinct trimmed texts across segments
    pub unique_text_count: usize,
    /// Segments whose translation equals their original text
    pub untranslated_count: usize,
    /// Target language the set was validated against
    pub target_language: String,
    /// Non-fatal warnings emitted during validation
    pub warnings: Vec<String>,
}

/// Validates translated segment sets against degenerate-output heuristics
pub struct TranslationValidator {
    config: ValidationConfig,
}

impl TranslationValidator {
    /// Create a validator with default thresholds
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a validator with custom thresholds
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a segment set against the target language.
    ///
    /// Read-only over the input; fails with `ValidationError` on any of
    /// the fatal heuristics, returns an outcome (possibly with warnings)
    /// otherwise.
    pub fn validate(
        &self,
        segments: &[Segment],
        target_language: &str,
    ) -> Result<ValidationOutcome, ValidationError> {
        if segments.is_empty() {
            return Err(ValidationError::EmptySegmentSet);
        }

        let total = segments.len();
        let unique_texts: HashSet<&str> = segments.iter().map(|s| s.text.trim()).collect();
        let unique_count = unique_texts.len();

        let untranslated_count = segments
            .iter()
            .filter(|s| {
                s.original_text
                    .as_deref()
                    .is_some_and(|orig| orig.trim() == s.text.trim())
            })
            .count();

        if !self.config.enabled {
            debug!("Validation disabled, accepting {} segments", total);
            return Ok(ValidationOutcome {
                is_valid: true,
                total_segments: total,
                unique_text_count: unique_count,
                untranslated_count,
                target_language: target_language.to_string(),
                warnings: Vec::new(),
            });
        }

        // All-identical output signals a wholesale upstream failure
        if unique_count == 1 && total > 1 {
            return Err(ValidationError::IdenticalText { count: total });
        }

        // Untranslated-content heuristic: translation echoed the source
        if total > 0 {
            let untranslated_ratio = untranslated_count as f64 / total as f64;
            if untranslated_ratio > self.config.untranslated_threshold {
                return Err(ValidationError::MostlyUntranslated {
                    untranslated: untranslated_count,
                    total,
                });
            }
        }

        // Script check: the combined text must contain at least one
        // character of the target language's expected script. Unknown
        // languages skip the check.
        let scripts = language_utils::expected_scripts(target_language);
        if !scripts.is_empty() {
            let combined: String = segments.iter().map(|s| s.text.as_str()).collect();
            let any_match = combined
                .chars()
                .any(|c| scripts.iter().any(|script| script.contains(c)));

            if !any_match {
                return Err(ValidationError::WrongScript {
                    language: target_language.to_string(),
                    script: scripts[0].name().to_string(),
                });
            }
        }

        let mut warnings = Vec::new();

        // Low lexical variety: likely degraded, not proven broken
        if total > self.config.low_variety_min_segments {
            let variety = unique_count as f64 / total as f64;
            if variety < self.config.low_variety_ratio {
                let message = format!(
                    "Low lexical variety: {} unique texts across {} segments",
                    unique_count, total
                );
                warn!("{}", message);
                warnings.push(message);
            }
        }

        debug!(
            "Validation passed: {} segments, {} unique, {} untranslated",
            total, unique_count, untranslated_count
        );

        Ok(ValidationOutcome {
            is_valid: true,
            total_segments: total,
            unique_text_count: unique_count,
            untranslated_count,
            target_language: target_language.to_string(),
            warnings,
        })
    }
}

impl Default for TranslationValidator {
    fn default() -> Self {
        Self::new()
    }
}
