//! Name matching and forced termination (killall).
//!
//! Matching and signaling are separate passes: every candidate is collected
//! before the first signal is sent, so killing one process cannot disturb
//! the directory scan still running for the others.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ProcError;
use crate::process::reader::ProcFs;
use crate::process::{read_display_name, read_live_stat};

/// Case-sensitive substring test, no wildcard expansion.
pub fn name_matches(name: &str, pattern: &str) -> bool {
    name.contains(pattern)
}

/// Returns the PIDs in `pids` whose display name contains `pattern`, in
/// enumeration order. `exclude` (normally the caller's own PID) is never
/// returned. Processes that vanish during the scan are skipped.
pub fn find_matches(
    fs: &ProcFs,
    pids: &[u32],
    pattern: &str,
    exclude: Option<u32>,
) -> Result<Vec<u32>, ProcError> {
    if pattern.is_empty() {
        return Err(ProcError::EmptyPattern);
    }

    let matches: Vec<u32> = pids
        .iter()
        .copied()
        .filter(|&pid| Some(pid) != exclude)
        .filter(|&pid| {
            let stat = match read_live_stat(fs, pid) {
                Some(s) => s,
                None => return false,
            };
            let name = read_display_name(fs, pid, &stat);
            let hit = name_matches(&name, pattern);
            if hit {
                debug!("PID {} ({}) matches '{}'", pid, name, pattern);
            }
            hit
        })
        .collect();

    Ok(matches)
}

/// Delivers the termination signal to a single process.
pub trait Signaler {
    fn kill(&self, pid: u32) -> Result<(), ProcError>;
}

/// Sends SIGKILL through `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NixSignaler;

impl Signaler for NixSignaler {
    fn kill(&self, pid: u32) -> Result<(), ProcError> {
        let raw = i32::try_from(pid).map_err(|_| ProcError::Signal {
            pid,
            source: Errno::EINVAL,
        })?;
        signal::kill(Pid::from_raw(raw), Signal::SIGKILL)
            .map_err(|source| ProcError::Signal { pid, source })
    }
}

/// Outcome of a termination pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KillReport {
    pub signaled: Vec<u32>,
    /// Already gone by the time the signal was sent.
    pub vanished: Vec<u32>,
    pub failed: Vec<(u32, String)>,
}

/// Signals every PID in `pids`. Each PID is handled independently; a
/// failure is recorded and the remaining PIDs are still processed.
pub fn terminate<S: Signaler + ?Sized>(pids: &[u32], signaler: &S) -> KillReport {
    let mut report = KillReport::default();

    for &pid in pids {
        match signaler.kill(pid) {
            Ok(()) => {
                info!("Sent SIGKILL to {}", pid);
                report.signaled.push(pid);
            }
            Err(ProcError::Signal {
                source: Errno::ESRCH,
                ..
            }) => {
                debug!("Process {} exited before it could be signaled", pid);
                report.vanished.push(pid);
            }
            Err(e) => {
                warn!("{}", e);
                report.failed.push((pid, e.to_string()));
            }
        }
    }

    report
}
