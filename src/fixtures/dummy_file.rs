// src/fixtures/dummy_file.rs
//! Dummy file generation for disk workloads

use crate::utils::errors::{HarnessError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Write chunk size (1 MiB)
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Bytes in one megabyte as used by the CLI
pub const MEGABYTE: u64 = 1024 * 1024;

/// Convert a size in megabytes to bytes, rejecting sizes past `u64::MAX`
pub fn megabytes(size_mb: u64) -> Result<u64> {
    size_mb.checked_mul(MEGABYTE).ok_or_else(|| {
        HarnessError::FixtureFailed(format!("{} MB does not fit in a file size", size_mb))
    })
}

/// Create (or truncate) `path` and fill it with exactly `size_bytes` bytes
pub fn create_dummy_file(path: &Path, size_bytes: u64) -> Result<u64> {
    info!("Creating dummy file {:?} ({} bytes)", path, size_bytes);

    let file = File::create(path).map_err(|e| {
        HarnessError::FixtureFailed(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    let chunk: Vec<u8> = (0..CHUNK_SIZE).map(|i| (i % 251) as u8).collect();
    let mut remaining = size_bytes;

    while remaining > 0 {
        let len = remaining.min(CHUNK_SIZE as u64) as usize;
        writer.write_all(&chunk[..len]).map_err(|e| {
            HarnessError::FixtureFailed(format!("Failed to write {}: {}", path.display(), e))
        })?;
        remaining -= len as u64;
    }

    let file = writer.into_inner().map_err(|e| {
        HarnessError::FixtureFailed(format!("Failed to flush {}: {}", path.display(), e))
    })?;
    file.sync_all().map_err(|e| {
        HarnessError::FixtureFailed(format!("Failed to sync {}: {}", path.display(), e))
    })?;

    debug!("Dummy file {:?} written", path);
    Ok(size_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dummy.dat");

        let size = 3 * CHUNK_SIZE as u64 + 17;
        assert_eq!(create_dummy_file(&path, size).unwrap(), size);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dat");

        create_dummy_file(&path, 0).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_megabytes_overflow() {
        assert_eq!(megabytes(1024).unwrap(), 1024 * 1024 * 1024);
        assert_eq!(megabytes(0).unwrap(), 0);

        let err = megabytes(u64::MAX).unwrap_err();
        assert!(matches!(err, HarnessError::FixtureFailed(_)));
        assert!(megabytes(u64::MAX / MEGABYTE + 1).is_err());
    }

    #[test]
    fn test_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/dummy.dat");

        let err = create_dummy_file(&path, 10).unwrap_err();
        assert!(matches!(err, HarnessError::FixtureFailed(_)));
    }
}
