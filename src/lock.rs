//! File locking and atomic writes for the file-backed key-value store
//!
//! - File locking (using fs2/flock) on a `<file>.lock` sidecar
//! - Atomic write pattern (write temp + rename)
//! - Lock timeout with configurable wait

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Default retry interval when waiting for a lock
const LOCK_RETRY_INTERVAL_MS: u64 = 50;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// A file lock guard that releases the lock when dropped
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock on a file with timeout
    ///
    /// If the file doesn't exist, it will be created.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let retry_interval = Duration::from_millis(LOCK_RETRY_INTERVAL_MS);

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(FileLock {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if is_lock_contended(&e) => {
                    if start.elapsed() >= timeout {
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(retry_interval);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Path of the lock sidecar guarding `path`
pub fn lock_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

/// Atomically write data to a file
///
/// Writes a temporary file in the same directory, then renames it over
/// the target. Does NOT acquire a lock.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Temp file must live in the same directory for rename to be atomic
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Write data atomically while holding the `<path>.lock` sidecar
pub fn write_atomic_locked(path: impl AsRef<Path>, data: &[u8], timeout_ms: u64) -> Result<()> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    write_atomic(path, data)
}

/// Read a file as a string while holding its lock.
///
/// Returns `Ok(None)` when the file does not exist and
/// [`Error::InvalidUtf8`] when its bytes are not text.
pub fn read_locked_str(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Option<String>> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;

    match fs::read(path) {
        Ok(data) => String::from_utf8(data)
            .map(Some)
            .map_err(|_| Error::InvalidUtf8(path.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::Io(err)),
    }
}

/// Remove a file while holding its lock. Missing files are not an error.
pub fn remove_locked(path: impl AsRef<Path>, timeout_ms: u64) -> Result<()> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Error::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_lock_acquire_release() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("test.lock");

        let lock = FileLock::acquire(&lock_path, 1000).unwrap();
        assert!(lock_path.exists());
        assert_eq!(lock.path(), lock_path.as_path());

        drop(lock);

        let lock2 = FileLock::acquire(&lock_path, 0).unwrap();
        assert_eq!(lock2.path(), lock_path.as_path());
    }

    #[test]
    fn test_lock_timeout_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("busy.lock");

        let _held = FileLock::acquire(&lock_path, 1000).unwrap();
        let err = FileLock::acquire(&lock_path, 100).err().expect("should time out");
        assert!(matches!(err, Error::LockFailed(path) if path == lock_path));
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("blob.json");

        write_atomic(&file_path, b"first").unwrap();
        write_atomic(&file_path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }

    #[test]
    fn test_locked_read_write_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("data.json");

        assert_eq!(read_locked_str(&file_path, 1000).unwrap(), None);

        write_atomic_locked(&file_path, b"{\"key\": \"value\"}", 1000).unwrap();
        assert_eq!(
            read_locked_str(&file_path, 1000).unwrap().as_deref(),
            Some("{\"key\": \"value\"}")
        );

        remove_locked(&file_path, 1000).unwrap();
        assert!(!file_path.exists());
        remove_locked(&file_path, 1000).unwrap();
    }

    #[test]
    fn test_locked_read_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.json");
        fs::write(&file_path, [0x5b, 0xc3, 0x28, 0x5d]).unwrap();

        let err = read_locked_str(&file_path, 1000).unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8(path) if path == file_path));
    }
}
