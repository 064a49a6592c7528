//! Mods folder file operations and SHA1 checks
//!
//! The mod portal publishes a SHA1 digest per release archive; an archive
//! already present with the same name and digest is considered up to date and
//! is never re-downloaded. Archives are stored as-is (the game loads the zip
//! files directly), so the store only moves, hashes and deletes files.

use crate::Result;
use sha1::{Digest, Sha1};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// File operations on a Factorio mods directory.
#[derive(Debug, Clone)]
pub struct ModStore {
    mods_dir: PathBuf,
    dry_run: bool,
}

impl ModStore {
    pub fn new<P: AsRef<Path>>(mods_dir: P, dry_run: bool) -> Self {
        Self {
            mods_dir: mods_dir.as_ref().to_path_buf(),
            dry_run,
        }
    }

    pub fn mods_dir(&self) -> &Path {
        &self.mods_dir
    }

    /// Target path for a release archive inside the mods directory.
    pub fn archive_path(&self, file_name: &str) -> PathBuf {
        self.mods_dir.join(file_name)
    }

    /// True when an archive with this name already exists and its SHA1
    /// matches. Used to short-circuit downloads of unchanged releases.
    pub fn has_matching_archive(&self, file_name: &str, sha1: &str) -> Result<bool> {
        let path = self.archive_path(file_name);
        if !path.exists() {
            return Ok(false);
        }
        let digest = sha1_of_file(&path)?;
        Ok(digest.eq_ignore_ascii_case(sha1))
    }

    /// Delete a release archive if present. Honors dry-run.
    pub fn remove_archive(&self, file_name: &str) -> Result<()> {
        let path = self.archive_path(file_name);
        if !path.is_file() {
            return Ok(());
        }
        if self.dry_run {
            println!("[DRY RUN] Would delete {}", path.display());
            return Ok(());
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}

/// Streaming SHA1 of a file, hex encoded.
pub fn sha1_of_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0; 65536];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
