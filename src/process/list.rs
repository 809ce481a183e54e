//! Flat per-process attribute records.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::process::parsers::{
    parse_base_address, parse_cmdline, parse_state, BaseAddressPolicy, RunState,
};
use crate::process::reader::ProcFs;
use crate::process::{CMDLINE_FILE, CWD_LINK, EXE_LINK, MAPS_FILE, STAT_FILE};

/// Attributes of one process. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub exe: String,
    pub cwd: String,
    pub base_address: u64,
    pub state: RunState,
    pub cmdline: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub base_address_policy: BaseAddressPolicy,
    /// Drop records whose executable or working directory is unresolvable.
    pub skip_unresolved: bool,
    /// Read records on the rayon pool.
    pub parallel: bool,
}

/// Reads the record for `pid`. `None` if the process vanished or its stat
/// line has no valid run-state.
pub fn read_record(fs: &ProcFs, pid: u32, policy: BaseAddressPolicy) -> Option<ProcessRecord> {
    let state = parse_state(&fs.read_text(pid, STAT_FILE))?;

    let exe = fs.read_link(pid, EXE_LINK);
    let cwd = fs.read_link(pid, CWD_LINK);
    let base_address = parse_base_address(&fs.read_text(pid, MAPS_FILE), &exe, policy);
    let cmdline = parse_cmdline(&fs.read_file(pid, CMDLINE_FILE));

    Some(ProcessRecord {
        pid,
        exe,
        cwd,
        base_address,
        state,
        cmdline,
    })
}

/// Builds one record per live process in `pids`, preserving `pids` order.
pub fn build_list(fs: &ProcFs, pids: &[u32], opts: ListOptions) -> Vec<ProcessRecord> {
    let read = |&pid: &u32| {
        let record = read_record(fs, pid, opts.base_address_policy)?;
        if opts.skip_unresolved && (record.exe.is_empty() || record.cwd.is_empty()) {
            return None;
        }
        Some(record)
    };

    let records: Vec<ProcessRecord> = if opts.parallel {
        pids.par_iter().filter_map(read).collect()
    } else {
        pids.iter().filter_map(read).collect()
    };

    debug!(
        "Listed {} of {} enumerated processes",
        records.len(),
        pids.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn test_read_record_full() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pid_dir = dir.path().join("100");
        fs::create_dir(&pid_dir).expect("Failed to create pid dir");
        fs::write(pid_dir.join("stat"), "100 (bash) R 1 100 100 0").expect("write stat");
        fs::write(
            pid_dir.join("maps"),
            "7f00-7f10 r--p 00000000 08:01 9 /lib/ld.so\n5500-5510 r--p 00000000 08:01 7 /bin/bash\n",
        )
        .expect("write maps");
        fs::write(pid_dir.join("cmdline"), b"bash\0-c\0echo hi there\0").expect("write cmdline");
        symlink("/bin/bash", pid_dir.join("exe")).expect("exe link");
        symlink("/home/user", pid_dir.join("cwd")).expect("cwd link");

        let procfs = ProcFs::new(dir.path(), 4096);
        let record = read_record(&procfs, 100, BaseAddressPolicy::ExecutableMapping)
            .expect("record is valid");

        assert_eq!(record.pid, 100);
        assert_eq!(record.exe, "/bin/bash");
        assert_eq!(record.cwd, "/home/user");
        assert_eq!(record.base_address, 0x5500);
        assert_eq!(record.state, RunState::Running);
        assert_eq!(record.cmdline, vec!["bash", "-c", "echo hi there"]);
    }

    #[test]
    fn test_read_record_kernel_thread() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pid_dir = dir.path().join("2");
        fs::create_dir(&pid_dir).expect("Failed to create pid dir");
        fs::write(pid_dir.join("stat"), "2 (kthreadd) S 0 0 0 0").expect("write stat");

        let procfs = ProcFs::new(dir.path(), 4096);
        let record = read_record(&procfs, 2, BaseAddressPolicy::ExecutableMapping)
            .expect("record is valid");
        assert_eq!(record.exe, "");
        assert_eq!(record.cwd, "");
        assert_eq!(record.base_address, 0);
        assert!(record.cmdline.is_empty());

        let opts = ListOptions {
            skip_unresolved: true,
            ..ListOptions::default()
        };
        assert!(build_list(&procfs, &[2], opts).is_empty());
    }

    #[test]
    fn test_read_record_invalid_state() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pid_dir = dir.path().join("3");
        fs::create_dir(&pid_dir).expect("Failed to create pid dir");
        fs::write(pid_dir.join("stat"), "3 (broken").expect("write stat");

        let procfs = ProcFs::new(dir.path(), 4096);
        assert!(read_record(&procfs, 3, BaseAddressPolicy::ExecutableMapping).is_none());
        assert!(read_record(&procfs, 4, BaseAddressPolicy::ExecutableMapping).is_none());
    }
}
