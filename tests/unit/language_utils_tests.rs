/*!
 * Tests for language code and script utilities
 */

use redub::language_utils::{
    expected_scripts, get_language_name, language_codes_match, normalize_to_part2t, ExpectedScript,
};

/// Test normalization from 2-letter to 3-letter codes
#[test]
fn test_normalize_to_part2t_withTwoLetterCodes_shouldReturnThreeLetter() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ja").unwrap(), "jpn");
    assert_eq!(normalize_to_part2t("ko").unwrap(), "kor");
}

/// Test that bibliographic 639-2/B codes convert to terminological form
#[test]
fn test_normalize_to_part2t_withBibliographicCodes_shouldConvert() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("dut").unwrap(), "nld");
}

/// Test that invalid codes are rejected
#[test]
fn test_normalize_to_part2t_withInvalidCode_shouldFail() {
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("zz").is_err());
    assert!(normalize_to_part2t("french").is_err());
}

/// Test matching across code formats
#[test]
fn test_language_codes_match_acrossFormats_shouldMatch() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fre", "fra"));
    assert!(language_codes_match("FR", "fra"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("fr", "invalid"));
}

/// Test language name lookup
#[test]
fn test_get_language_name_withValidCode_shouldReturnName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("jpn").unwrap(), "Japanese");
}

/// Test that Japanese expects both kana and han scripts
#[test]
fn test_expected_scripts_forJapanese_shouldIncludeKanaAndHan() {
    let scripts = expected_scripts("ja");
    assert!(scripts.contains(&ExpectedScript::Kana));
    assert!(scripts.contains(&ExpectedScript::Han));
}

/// Test script membership on representative characters
#[test]
fn test_script_contains_withRepresentativeChars_shouldClassify() {
    assert!(ExpectedScript::Latin.contains('é'));
    assert!(ExpectedScript::Hangul.contains('한'));
    assert!(ExpectedScript::Kana.contains('ひ'));
    assert!(ExpectedScript::Arabic.contains('م'));
    assert!(!ExpectedScript::Han.contains('a'));
}

/// Test that unconfigured languages report no expected script
#[test]
fn test_expected_scripts_withUnconfiguredLanguage_shouldBeEmpty() {
    // Swahili is a valid code without a configured script
    assert!(expected_scripts("sw").is_empty());
    assert!(expected_scripts("not-a-code").is_empty());
}
