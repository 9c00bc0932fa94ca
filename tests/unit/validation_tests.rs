/*!
 * Tests for translation validation heuristics
 */

use redub::app_config::ValidationConfig;
use redub::errors::ValidationError;
use redub::segment::Segment;
use redub::validation::TranslationValidator;

use crate::common;

/// Test that a healthy varied segment set passes validation
#[test]
fn test_validate_withVariedFrenchSegments_shouldPass() {
    let segments = common::french_segments(10);

    let validator = TranslationValidator::new();
    let outcome = validator.validate(&segments, "fr").unwrap();

    assert!(outcome.is_valid);
    assert_eq!(outcome.total_segments, 10);
    assert_eq!(outcome.unique_text_count, 10);
    assert!(outcome.warnings.is_empty());
}

/// Test that all-identical text is rejected
#[test]
fn test_validate_withIdenticalText_shouldReject() {
    let segments = common::identical_segments(5);

    let validator = TranslationValidator::new();
    let result = validator.validate(&segments, "fr");

    assert!(matches!(result, Err(ValidationError::IdenticalText { count: 5 })));
}

/// Test that a single segment is never treated as identical-text failure
#[test]
fn test_validate_withSingleSegment_shouldPass() {
    let segments = common::identical_segments(1);

    let validator = TranslationValidator::new();
    assert!(validator.validate(&segments, "fr").is_ok());
}

/// Test that an empty segment set is rejected
#[test]
fn test_validate_withEmptySet_shouldReject() {
    let validator = TranslationValidator::new();
    let result = validator.validate(&[], "fr");

    assert!(matches!(result, Err(ValidationError::EmptySegmentSet)));
}

/// Test that mostly-untranslated content is rejected
#[test]
fn test_validate_withMostlyUntranslatedSegments_shouldReject() {
    // 4 of 5 segments echo their original text
    let mut segments: Vec<Segment> = (0..4)
        .map(|i| {
            Segment::new(format!("Untranslated line {}", i))
                .with_original(format!("Untranslated line {}", i))
        })
        .collect();
    segments.push(Segment::new("Une vraie traduction.").with_original("A real translation."));

    let validator = TranslationValidator::new();
    let result = validator.validate(&segments, "fr");

    assert!(matches!(
        result,
        Err(ValidationError::MostlyUntranslated { untranslated: 4, total: 5 })
    ));
}

/// Test that text in the wrong script for the target language is rejected
#[test]
fn test_validate_withLatinTextForRussian_shouldReject() {
    let segments = vec![
        Segment::new("This is still English text."),
        Segment::new("So is this line here."),
    ];

    let validator = TranslationValidator::new();
    let result = validator.validate(&segments, "ru");

    assert!(matches!(result, Err(ValidationError::WrongScript { .. })));
}

/// Test that Cyrillic text for Russian passes the script check
#[test]
fn test_validate_withCyrillicTextForRussian_shouldPass() {
    let segments = vec![
        Segment::new("Это переведённая строка."),
        Segment::new("И ещё одна строка."),
    ];

    let validator = TranslationValidator::new();
    assert!(validator.validate(&segments, "ru").is_ok());
}

/// Test that unknown target languages skip the script check
#[test]
fn test_validate_withUnknownLanguage_shouldSkipScriptCheck() {
    let segments = vec![
        Segment::new("Some text in any script."),
        Segment::new("More text in any script at all."),
    ];

    let validator = TranslationValidator::new();
    assert!(validator.validate(&segments, "xx").is_ok());
}

/// Test that low text variety produces a warning but not a rejection
#[test]
fn test_validate_withLowVariety_shouldWarnOnly() {
    // 10 segments but only 2 distinct texts
    let mut segments = common::identical_segments(9);
    segments.push(Segment::new("Un texte différent."));

    let validator = TranslationValidator::new();
    let outcome = validator.validate(&segments, "fr").unwrap();

    assert!(outcome.is_valid);
    assert!(!outcome.warnings.is_empty());
}

/// Test that disabled validation accepts even degenerate input
#[test]
fn test_validate_whenDisabled_shouldAcceptIdenticalText() {
    let segments = common::identical_segments(5);

    let config = ValidationConfig {
        enabled: false,
        ..Default::default()
    };
    let validator = TranslationValidator::with_config(config);

    let outcome = validator.validate(&segments, "fr").unwrap();
    assert!(outcome.is_valid);
}
