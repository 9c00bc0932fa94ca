use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and
/// matching ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes,
/// plus the expected-script lookup used by translation validation.
/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        // Check if it's already a valid ISO 639-2/T code
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // Check if it's a ISO 639-2/B code that needs converting to ISO 639-2/T
        match normalized_code.as_str() {
            "fre" => return Ok("fra".to_string()),
            "ger" => return Ok("deu".to_string()),
            "dut" => return Ok("nld".to_string()),
            "gre" => return Ok("ell".to_string()),
            "chi" => return Ok("zho".to_string()),
            "cze" => return Ok("ces".to_string()),
            "per" => return Ok("fas".to_string()),
            "rum" => return Ok("ron".to_string()),
            "slo" => return Ok("slk".to_string()),
            _ => {}
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_to_part2t(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_to_part2t(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// The writing system expected for a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedScript {
    Latin,
    Cyrillic,
    Arabic,
    Hebrew,
    Greek,
    Devanagari,
    Han,
    Kana,
    Hangul,
    Thai,
}

impl ExpectedScript {
    /// Human-readable script name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin => "Latin",
            Self::Cyrillic => "Cyrillic",
            Self::Arabic => "Arabic",
            Self::Hebrew => "Hebrew",
            Self::Greek => "Greek",
            Self::Devanagari => "Devanagari",
            Self::Han => "Han",
            Self::Kana => "Kana",
            Self::Hangul => "Hangul",
            Self::Thai => "Thai",
        }
    }

    /// Whether a character belongs to this script
    pub fn contains(&self, c: char) -> bool {
        match self {
            Self::Latin => c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c),
            Self::Cyrillic => ('\u{0400}'..='\u{04FF}').contains(&c),
            Self::Arabic => ('\u{0600}'..='\u{06FF}').contains(&c),
            Self::Hebrew => ('\u{0590}'..='\u{05FF}').contains(&c),
            Self::Greek => ('\u{0370}'..='\u{03FF}').contains(&c),
            Self::Devanagari => ('\u{0900}'..='\u{097F}').contains(&c),
            Self::Han => ('\u{4E00}'..='\u{9FFF}').contains(&c),
            // Hiragana and katakana blocks; Japanese text mixes these with Han
            Self::Kana => ('\u{3040}'..='\u{30FF}').contains(&c),
            Self::Hangul => ('\u{AC00}'..='\u{D7AF}').contains(&c),
            Self::Thai => ('\u{0E00}'..='\u{0E7F}').contains(&c),
        }
    }
}

/// Get the scripts a translation into the given language is expected to use.
///
/// Returns an empty slice for languages without a configured script, which
/// callers treat as "skip the script check".
pub fn expected_scripts(code: &str) -> &'static [ExpectedScript] {
    let normalized = match normalize_to_part2t(code) {
        Ok(n) => n,
        Err(_) => return &[],
    };

    match normalized.as_str() {
        "eng" | "fra" | "deu" | "spa" | "ita" | "por" | "nld" | "pol" | "ron" | "ces" | "swe"
        | "dan" | "nor" | "fin" | "hun" | "tur" | "vie" | "ind" => &[ExpectedScript::Latin],
        "rus" | "ukr" | "bul" | "srp" | "bel" => &[ExpectedScript::Cyrillic],
        "ara" | "fas" | "urd" => &[ExpectedScript::Arabic],
        "heb" => &[ExpectedScript::Hebrew],
        "ell" => &[ExpectedScript::Greek],
        "hin" | "mar" | "nep" => &[ExpectedScript::Devanagari],
        "zho" => &[ExpectedScript::Han],
        "jpn" => &[ExpectedScript::Kana, ExpectedScript::Han],
        "kor" => &[ExpectedScript::Hangul],
        "tha" => &[ExpectedScript::Thai],
        _ => &[],
    }
}
