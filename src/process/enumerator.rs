//! Process discovery: scans the process root for PID-named directories.

use crate::error::ProcError;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Parses a directory entry name as a PID. Only names made entirely of
/// ASCII digits are accepted; `"12a"` and `"a12"` are both rejected.
pub fn parse_pid_name(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Lists the PIDs visible under `root` in directory order.
///
/// Failing to open the root itself is fatal. Anything that goes wrong for an
/// individual entry only skips that entry; the scan always continues.
pub fn enumerate_pids(root: &Path) -> Result<Vec<u32>, ProcError> {
    let entries = fs::read_dir(root).map_err(|source| ProcError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                trace!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        let name = entry.file_name();
        let pid = match name.to_str().and_then(parse_pid_name) {
            Some(v) => v,
            None => continue,
        };

        // Cheap type check where the directory API reports it; an unknown
        // type is not a reason to reject the entry.
        if let Ok(ft) = entry.file_type() {
            if !ft.is_dir() {
                continue;
            }
        }

        out.push(pid);
    }

    debug!("Enumerated {} processes under {}", out.len(), root.display());
    Ok(out)
}
