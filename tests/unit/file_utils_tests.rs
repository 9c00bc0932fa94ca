/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use redub::file_utils::FileManager;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "exists.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists distinguishes directories from files
#[test]
fn test_dir_exists_withFileAtPath_shouldReturnFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "plain.tmp", "x")?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that write_to_file creates parent directories and read_to_string
/// gets the content back
#[test]
fn test_write_to_file_withNestedPath_shouldCreateParentsAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("conf/deep/settings.json");

    FileManager::write_to_file(&target, "{\"key\": true}")?;

    assert_eq!(FileManager::read_to_string(&target)?, "{\"key\": true}");
    Ok(())
}

/// Test that read_to_string surfaces the missing path in its error
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let result = FileManager::read_to_string("no_such_file_9f2c.json");
    assert!(result.is_err());
}

/// Test that segment_artifact_path is keyed by job id and zero-padded index
#[test]
fn test_segment_artifact_path_shouldIncludeJobIdAndIndex() {
    let path = FileManager::segment_artifact_path("/tmp/work", "job42", 7);
    assert_eq!(path, Path::new("/tmp/work/job42_seg0007.wav"));
}

/// Test that output_track_path uses the job id and dub suffix
#[test]
fn test_output_track_path_shouldUseJobId() {
    let path = FileManager::output_track_path("/out", "job42");
    assert_eq!(path, Path::new("/out/job42.dub.wav"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("nested/artifacts");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());
    Ok(())
}

/// Test that file_size reports the byte length
#[test]
fn test_file_size_withKnownContent_shouldReturnByteCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "sized.tmp", "12345")?;

    assert_eq!(FileManager::file_size(&test_file)?, 5);
    Ok(())
}

/// Test that cleanup removes only the job's files
#[test]
fn test_cleanup_job_files_shouldOnlyRemoveMatchingJob() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "jobA_seg0000.wav", "a")?;
    common::create_test_file(&dir, "jobA_seg0001.wav", "a")?;
    let other = common::create_test_file(&dir, "jobB_seg0000.wav", "b")?;

    let removed = FileManager::cleanup_job_files(&dir, "jobA");

    assert_eq!(removed, 2);
    assert!(other.exists());
    Ok(())
}

/// Test that cleanup of a missing directory is a harmless no-op
#[test]
fn test_cleanup_job_files_withMissingDir_shouldReturnZero() {
    assert_eq!(FileManager::cleanup_job_files("./no_such_dir_12345", "job"), 0);
}

/// Test that copy_file creates the target directory
#[test]
fn test_copy_file_shouldCreateTargetDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "src.wav", "payload")?;
    let target = dir.join("deep/nested/dst.wav");

    FileManager::copy_file(&source, &target)?;

    assert_eq!(std::fs::read_to_string(&target)?, "payload");
    Ok(())
}
