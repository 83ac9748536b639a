//! Advisory file locking for section appends
//!
//! Serializes the read-modify-append sequence of concurrent writers targeting
//! the same section. Search takes no lock; reads see the latest on-disk state.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::error::{MnemoError, Result};

/// Bounded wait before giving up on a held lock
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);
/// Poll interval while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// Age after which a lock file is presumed abandoned
const STALE_AFTER: Duration = Duration::from_secs(10);

/// Guard for the per-section advisory lock.
///
/// The lock file is created atomically with `create_new`; holding the guard
/// means owning the file. The file is removed when the guard drops, error
/// paths included.
#[derive(Debug)]
pub struct SectionLock {
    path: PathBuf,
}

impl SectionLock {
    /// Acquire the lock for a section directory, waiting up to the default
    /// timeout before failing with `Busy`
    pub fn acquire(section_dir: &Path, project: &str, section: &str) -> Result<Self> {
        Self::acquire_with_timeout(section_dir, project, section, ACQUIRE_TIMEOUT)
    }

    /// Acquire with an explicit bounded wait
    pub fn acquire_with_timeout(
        section_dir: &Path,
        project: &str,
        section: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let path = section_dir.join(format!(".{}.lock", section));
        let start = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Owner pid, for post-mortem inspection only
                    let _ = write!(file, "{}", std::process::id());
                    return Ok(SectionLock { path });
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    if is_stale(&path) {
                        tracing::warn!(path = %path.display(), "removing stale lock file");
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    if start.elapsed() >= timeout {
                        return Err(MnemoError::Busy {
                            project: project.to_string(),
                            section: section.to_string(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Path of the lock file held by this guard
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SectionLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age >= STALE_AFTER)
}
