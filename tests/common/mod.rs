/*!
 * Common test utilities for the redub test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use redub::segment::Segment;

// Re-export the mock media toolkit module
pub mod mock_media;

/// Initializes logging for tests; repeated calls are harmless
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample translated SRT file for testing
pub fn create_test_srt(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
Ceci est un sous-titre de test.

2
00:00:05,000 --> 00:00:09,000
Il contient plusieurs entrées.

3
00:00:10,000 --> 00:00:14,000
À des fins de test.
"#;
    create_test_file(dir, filename, content)
}

/// Builds a varied French segment set of the given size
pub fn french_segments(count: usize) -> Vec<Segment> {
    (0..count)
        .map(|i| {
            Segment::new(format!("Ligne traduite numéro {} avec du texte.", i + 1))
                .with_original(format!("Translated line number {} with some text.", i + 1))
        })
        .collect()
}

/// Builds a segment set where every segment carries the same text
pub fn identical_segments(count: usize) -> Vec<Segment> {
    (0..count)
        .map(|_| Segment::new("Même texte partout."))
        .collect()
}
