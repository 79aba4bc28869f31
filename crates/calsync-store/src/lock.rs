//! Directory-scoped advisory locking for the calendar document.
//!
//! Multiple deliveries can be processed concurrently against the same
//! output directory; each load-mutate-persist cycle holds an exclusive
//! flock(2) on a sidecar file for its full duration so no invocation reads
//! a document another one is about to replace.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::debug;

/// Name of the sidecar lock file next to `reservation.ics`.
const LOCK_FILE: &str = ".reservation.ics.lock";

/// An exclusive lock over one calendar directory.
///
/// Released when dropped; closing the descriptor releases the flock. The
/// sidecar file itself is left in place between invocations.
#[derive(Debug)]
pub struct DirLock {
    _file: File,
}

impl DirLock {
    /// Acquires the lock, blocking until any concurrent holder releases it.
    pub fn acquire(directory: &Path) -> io::Result<Self> {
        let path = directory.join(LOCK_FILE);
        let file = OpenOptions::new().create(true).write(true).open(&path)?;
        Self::flock_exclusive(&file)?;
        debug!(path = %path.display(), "Acquired calendar directory lock");
        Ok(Self { _file: file })
    }

    #[cfg(unix)]
    fn flock_exclusive(file: &File) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// No advisory locking outside unix; the atomic rename in the store
    /// still keeps the document internally consistent.
    #[cfg(not(unix))]
    fn flock_exclusive(_file: &File) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_creates_sidecar_file() {
        let dir = tempdir().unwrap();
        let _lock = DirLock::acquire(dir.path()).unwrap();
        assert!(dir.path().join(LOCK_FILE).exists());
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempdir().unwrap();
        drop(DirLock::acquire(dir.path()).unwrap());
        // A second acquire must not block once the first guard is gone.
        let _relock = DirLock::acquire(dir.path()).unwrap();
    }

    #[test]
    fn acquire_fails_on_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(DirLock::acquire(&missing).is_err());
    }
}
