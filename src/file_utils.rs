use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::debug;

// @module: File and directory utilities, job-scoped artifact layout

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @returns: Size of a file in bytes
    pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to stat file: {:?}", path.as_ref()))?;
        Ok(metadata.len())
    }

    // @generates: Temp path for one segment's artifact, keyed by job id
    // so concurrent jobs never collide
    pub fn segment_artifact_path<P: AsRef<Path>>(
        temp_dir: P,
        job_id: &str,
        segment_index: usize,
    ) -> PathBuf {
        temp_dir
            .as_ref()
            .join(format!("{}_seg{:04}.wav", job_id, segment_index))
    }

    // @generates: Final output track path, keyed by job id
    pub fn output_track_path<P: AsRef<Path>>(output_dir: P, job_id: &str) -> PathBuf {
        output_dir.as_ref().join(format!("{}.dub.wav", job_id))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        // Ensure the target directory exists
        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        // Perform the copy
        fs::copy(from, to)?;

        Ok(())
    }

    /// Best-effort removal of every temp file belonging to a job.
    ///
    /// Never fails: artifacts that cannot be removed are skipped. Returns
    /// the number of files actually deleted.
    pub fn cleanup_job_files<P: AsRef<Path>>(temp_dir: P, job_id: &str) -> usize {
        let temp_dir = temp_dir.as_ref();
        if !Self::dir_exists(temp_dir) {
            return 0;
        }

        let mut removed = 0;
        for entry in WalkDir::new(temp_dir).max_depth(1).into_iter().flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name.starts_with(job_id) && fs::remove_file(path).is_ok() {
                removed += 1;
            }
        }

        debug!("Cleaned up {} temp files for job {}", removed, job_id);
        removed
    }
}
