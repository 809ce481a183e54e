//! Process table introspection over a `/proc`-style pseudo-filesystem.
//!
//! This module provides:
//! - `reader`: bounded, failure-tolerant reads of per-process pseudo-files
//! - `parsers`: decoders for stat, maps, cmdline and comm content
//! - `enumerator`: discovery of PID directories
//! - `hierarchy`: parent/child map for one snapshot
//! - `tree`: recursive process tree assembly
//! - `list`: flat attribute records
//! - `matcher`: name matching and forced termination

pub mod enumerator;
pub mod hierarchy;
pub mod list;
pub mod matcher;
pub mod parsers;
pub mod reader;
pub mod tree;

// Fixed pseudo-file names inside each process directory.
pub const STAT_FILE: &str = "stat";
pub const MAPS_FILE: &str = "maps";
pub const CMDLINE_FILE: &str = "cmdline";
pub const COMM_FILE: &str = "comm";
pub const EXE_LINK: &str = "exe";
pub const CWD_LINK: &str = "cwd";

// Re-export commonly used types
pub use enumerator::{enumerate_pids, parse_pid_name};
pub use hierarchy::ParentChildMap;
pub use list::{build_list, read_record, ListOptions, ProcessRecord};
pub use matcher::{find_matches, name_matches, terminate, KillReport, NixSignaler, Signaler};
pub use parsers::{BaseAddressPolicy, RunState};
pub use reader::{peak_read_bytes, ProcFs, DEFAULT_MAX_READ_KB, DEFAULT_PROC_ROOT};
pub use tree::{ProcessTreeNode, TreeBuilder, DEFAULT_MAX_TREE_DEPTH, MAX_TREE_DEPTH_LIMIT};

/// Reads the stat line of `pid` and returns it only if it carries a valid
/// run-state, i.e. the process is still there and readable.
pub fn read_live_stat(fs: &ProcFs, pid: u32) -> Option<String> {
    let stat = fs.read_text(pid, STAT_FILE);
    parsers::parse_state(&stat)?;
    Some(stat)
}

/// Short display name of `pid` from `comm`, falling back to the name
/// embedded in an already-read stat line.
pub fn read_display_name(fs: &ProcFs, pid: u32, stat: &str) -> String {
    let name = parsers::parse_display_name(&fs.read_file(pid, COMM_FILE));
    if !name.is_empty() {
        return name;
    }
    parsers::parse_stat_name(stat).unwrap_or_default().to_string()
}
