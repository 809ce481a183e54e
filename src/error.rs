//! Error types for the process introspection engine.
//!
//! Per-process read failures are never represented here: a process that
//! vanishes or denies access while it is being read is simply omitted from
//! the result. Only conditions that make a whole query meaningless, or that
//! the caller has to report to the user, become a `ProcError`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    #[error("Cannot read process root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("There is no process with the pid {0}")]
    ProcessNotFound(u32),

    #[error("Pattern must not be empty")]
    EmptyPattern,

    #[error("Failed to send signal to PID {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },
}
