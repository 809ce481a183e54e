//! Parent/child map for one process snapshot.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use rayon::prelude::*;
use tracing::debug;

use crate::process::parsers::parse_ppid;
use crate::process::reader::ProcFs;
use crate::process::STAT_FILE;

/// Maps a parent PID to its children in enumeration order.
///
/// A child is recorded under at most one parent and at most once; repeated
/// registrations are ignored. Built once per query and then only read.
#[derive(Debug, Default, Clone)]
pub struct ParentChildMap {
    children: HashMap<u32, Vec<u32>>,
    registered: HashSet<u32>,
}

impl ParentChildMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `child` under `parent`. Returns false if the child was
    /// already registered.
    pub fn insert(&mut self, parent: u32, child: u32) -> bool {
        if !self.registered.insert(child) {
            return false;
        }
        self.children.entry(parent).or_default().push(child);
        true
    }

    /// Children of `pid` in insertion order; empty for a leaf.
    pub fn children_of(&self, pid: u32) -> &[u32] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of registered children across all parents.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Reads the parent PID of every process in `pids` and builds the map.
    ///
    /// With `parallel` the stat reads fan out over the rayon pool, but the
    /// map itself is only ever written from this thread, in `pids` order.
    /// Processes whose stat line cannot be read or parsed are skipped; a
    /// parent that has already exited still gets its entry.
    pub fn build(fs: &ProcFs, pids: &[u32], parallel: bool) -> Self {
        let read_ppid = |&pid: &u32| parse_ppid(&fs.read_text(pid, STAT_FILE)).map(|pp| (pp, pid));

        let pairs: Vec<Option<(u32, u32)>> = if parallel {
            pids.par_iter().map(read_ppid).collect()
        } else {
            pids.iter().map(read_ppid).collect()
        };

        let mut map = Self::new();
        let mut skipped = 0usize;
        for pair in pairs {
            match pair {
                Some((parent, child)) => {
                    map.insert(parent, child);
                }
                None => skipped += 1,
            }
        }

        debug!(
            "Built parent/child map: {} processes, {} skipped",
            map.len(),
            skipped
        );
        map
    }
}
