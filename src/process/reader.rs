//! Bounded readers for per-process pseudo-files.
//!
//! Every read goes through [`ProcFs`], which never fails: an open, read or
//! readlink error yields an empty result that callers treat as "field
//! unknown". Reads are capped so a misbehaving pseudo-file can never make a
//! query block on an unbounded buffer.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Default mount point of the process pseudo-filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Default read ceiling per pseudo-file, in KB.
pub const DEFAULT_MAX_READ_KB: usize = 64;

/// Largest number of bytes returned by a single [`ProcFs::read_file`] call
/// in this process.
pub static PEAK_READ_BYTES: AtomicU64 = AtomicU64::new(0);

/// Raises `current_max` to `new_value` if it is larger.
pub fn update_max_buffer_usage(current_max: &AtomicU64, new_value: u64) {
    let mut current = current_max.load(Ordering::Relaxed);
    while new_value > current {
        match current_max.compare_exchange_weak(
            current,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(c) => current = c,
        }
    }
}

/// Returns the read high-water mark recorded so far.
pub fn peak_read_bytes() -> u64 {
    PEAK_READ_BYTES.load(Ordering::Relaxed)
}

/// Handle on a process root such as `/proc`.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    max_read_bytes: usize,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT, DEFAULT_MAX_READ_KB * 1024)
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>, max_read_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_read_bytes: max_read_bytes.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_read_bytes(&self) -> usize {
        self.max_read_bytes
    }

    /// Path of `name` inside the directory of `pid`.
    pub fn proc_path(&self, pid: u32, name: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(name)
    }

    /// Whether a directory for `pid` currently exists under the root.
    pub fn process_exists(&self, pid: u32) -> bool {
        self.root.join(pid.to_string()).is_dir()
    }

    /// Reads at most `max_read_bytes` of `/<root>/<pid>/<name>`.
    /// Returns an empty buffer on any failure.
    pub fn read_file(&self, pid: u32, name: &str) -> Vec<u8> {
        let path = self.proc_path(pid, name);
        match read_bounded(&path, self.max_read_bytes) {
            Ok(buf) => {
                update_max_buffer_usage(&PEAK_READ_BYTES, buf.len() as u64);
                if buf.len() >= self.max_read_bytes {
                    debug!(
                        "Read of {} hit the {} byte ceiling, content truncated",
                        path.display(),
                        self.max_read_bytes
                    );
                }
                buf
            }
            Err(e) => {
                trace!("Failed to read {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Like [`read_file`](Self::read_file) but decoded lossily as UTF-8.
    pub fn read_text(&self, pid: u32, name: &str) -> String {
        String::from_utf8_lossy(&self.read_file(pid, name)).into_owned()
    }

    /// Resolves the symbolic link `/<root>/<pid>/<name>`.
    /// Returns an empty string on any failure.
    pub fn read_link(&self, pid: u32, name: &str) -> String {
        let path = self.proc_path(pid, name);
        match fs::read_link(&path) {
            Ok(target) => target.to_string_lossy().into_owned(),
            Err(e) => {
                trace!("Failed to resolve link {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

fn read_bounded(path: &Path, limit: usize) -> Result<Vec<u8>, std::io::Error> {
    let file = fs::File::open(path)?;
    let capacity = limit.min(8 * 1024);
    let mut reader = BufReader::with_capacity(capacity, file).take(limit as u64);
    let mut buf = Vec::with_capacity(capacity);
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn test_read_file_missing_returns_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let fs = ProcFs::new(dir.path(), 1024);

        assert!(fs.read_file(42, "stat").is_empty());
        assert_eq!(fs.read_text(42, "comm"), "");
        assert_eq!(fs.read_link(42, "exe"), "");
    }

    #[test]
    fn test_read_file_respects_ceiling() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("7")).expect("Failed to create pid dir");
        std::fs::write(dir.path().join("7").join("maps"), vec![b'a'; 5000])
            .expect("Failed to write maps");

        let fs = ProcFs::new(dir.path(), 1000);
        assert_eq!(fs.read_file(7, "maps").len(), 1000);
        assert!(peak_read_bytes() >= 1000);
    }

    #[test]
    fn test_read_link_resolves_target() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pid_dir = dir.path().join("9");
        std::fs::create_dir(&pid_dir).expect("Failed to create pid dir");
        symlink("/usr/bin/my prog", pid_dir.join("exe")).expect("Failed to create symlink");

        let fs = ProcFs::new(dir.path(), 1024);
        assert_eq!(fs.read_link(9, "exe"), "/usr/bin/my prog");
        assert!(fs.process_exists(9));
        assert!(!fs.process_exists(10));
    }

    #[test]
    fn test_update_max_buffer_usage_only_grows() {
        let max = AtomicU64::new(10);
        update_max_buffer_usage(&max, 5);
        assert_eq!(max.load(Ordering::Relaxed), 10);
        update_max_buffer_usage(&max, 20);
        assert_eq!(max.load(Ordering::Relaxed), 20);
    }
}
