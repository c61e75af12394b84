//! File locking and atomic writes for the bug store
//!
//! Every store is guarded by a `<path>.lock` sidecar. Commands that change
//! the store hold one [`FileLock`] from load to save, so concurrent `bt`
//! runs are serialized rather than overwriting each other.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const LOCK_RETRY_INTERVAL_MS: u64 = 50;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2 can surface sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// Exclusive lock on a sidecar file, released on drop
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Wait up to `timeout_ms` for the lock at `path`, creating the file if missing.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    debug!(lock = %path.display(), "lock acquired");
                    return Ok(Self { file });
                }
                Err(err) if is_lock_contended(&err) => {
                    if Instant::now() >= deadline {
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(Duration::from_millis(LOCK_RETRY_INTERVAL_MS));
                }
                Err(err) => return Err(Error::Io(err)),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Path of the sidecar lock file guarding `path`
pub fn lock_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

/// Replace `path` with `data` via a sibling temp file and a rename.
///
/// Takes no lock; callers hold the store's [`FileLock`].
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(format!(".tmp.{}", std::process::id()));
    let temp_path = PathBuf::from(temp_name);

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read `path` as UTF-8 while holding its sidecar lock.
pub fn read_locked_str(path: &Path, timeout_ms: u64) -> Result<String> {
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    read_str(path)
}

/// Read `path` as UTF-8; the caller is responsible for locking.
pub fn read_str(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    String::from_utf8(data)
        .map_err(|err| Error::OperationFailed(format!("{} is not UTF-8: {err}", path.display())))
}
