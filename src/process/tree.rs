//! Process tree assembly over a [`ParentChildMap`].
//!
//! Trees are expanded with an explicit work stack, so the depth of a
//! snapshot never translates into call-stack depth.

use ahash::AHashSet as HashSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ProcError;
use crate::process::hierarchy::ParentChildMap;
use crate::process::reader::ProcFs;
use crate::process::{read_display_name, read_live_stat};

/// Default limit on how deep a tree is expanded.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 1024;

/// Hard ceiling on the expansion depth. Dropping and serializing a node
/// still recurses once per level.
pub const MAX_TREE_DEPTH_LIMIT: usize = 1024;

/// PID of the synthetic root whose children are the top-level processes.
pub const SYNTHETIC_ROOT_PID: u32 = 0;

/// One process and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessTreeNode {
    pub pid: u32,
    pub name: String,
    pub children: Vec<ProcessTreeNode>,
}

/// A node under construction: children not yet visited stay in `pending`.
struct Frame<'a> {
    pid: u32,
    name: String,
    pending: std::slice::Iter<'a, u32>,
    children: Vec<ProcessTreeNode>,
}

impl Frame<'_> {
    fn into_node(self) -> ProcessTreeNode {
        ProcessTreeNode {
            pid: self.pid,
            name: self.name,
            children: self.children,
        }
    }
}

/// Expands process trees from a snapshot's parent/child map.
pub struct TreeBuilder<'a> {
    fs: &'a ProcFs,
    map: &'a ParentChildMap,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    /// `max_depth` is clamped to `1..=MAX_TREE_DEPTH_LIMIT`.
    pub fn new(fs: &'a ProcFs, map: &'a ParentChildMap, max_depth: usize) -> Self {
        Self {
            fs,
            map,
            max_depth: max_depth.clamp(1, MAX_TREE_DEPTH_LIMIT),
        }
    }

    /// Builds the tree rooted at `pid`, or `None` if the process is gone.
    ///
    /// A PID already on the path from the root is not expanded again, so a
    /// process recorded as its own parent yields a leaf.
    pub fn build(&self, pid: u32) -> Option<ProcessTreeNode> {
        let mut stack = vec![self.open(pid, 1)?];
        let mut on_path = HashSet::new();
        on_path.insert(pid);

        loop {
            let depth = stack.len();
            let top = stack.last_mut()?;
            match top.pending.next() {
                Some(&child) => {
                    if on_path.contains(&child) {
                        warn!("PID {} is its own ancestor below PID {}, skipping", child, top.pid);
                        continue;
                    }
                    if let Some(frame) = self.open(child, depth + 1) {
                        on_path.insert(child);
                        stack.push(frame);
                    }
                }
                None => {
                    let frame = stack.pop()?;
                    on_path.remove(&frame.pid);
                    let node = frame.into_node();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Some(node),
                    }
                }
            }
        }
    }

    /// Reads one live process into a frame; children past the depth limit
    /// are left unexpanded.
    fn open(&self, pid: u32, depth: usize) -> Option<Frame<'a>> {
        let stat = match read_live_stat(self.fs, pid) {
            Some(s) => s,
            None => {
                debug!("Process {} vanished while building tree", pid);
                return None;
            }
        };
        let name = read_display_name(self.fs, pid, &stat);

        let map: &'a ParentChildMap = self.map;
        let mut child_pids = map.children_of(pid);
        if depth >= self.max_depth && !child_pids.is_empty() {
            warn!(
                "Process tree deeper than {} levels at PID {}, not expanding {} children",
                self.max_depth,
                pid,
                child_pids.len()
            );
            child_pids = &[];
        }

        Some(Frame {
            pid,
            name,
            pending: child_pids.iter(),
            children: Vec::new(),
        })
    }

    /// PIDs whose trees form the default forest: the children of PID 0, or
    /// of PID 1 when the snapshot exposes no children of PID 0.
    pub fn default_roots(&self) -> &'a [u32] {
        let roots = self.map.children_of(SYNTHETIC_ROOT_PID);
        if roots.is_empty() {
            self.map.children_of(1)
        } else {
            roots
        }
    }

    /// Builds the forest for `target`: every top-level tree when `None`, or
    /// the single tree rooted at the given PID.
    pub fn build_forest(&self, target: Option<u32>) -> Result<Vec<ProcessTreeNode>, ProcError> {
        match target {
            Some(pid) => {
                if !self.fs.process_exists(pid) {
                    return Err(ProcError::ProcessNotFound(pid));
                }
                let node = self.build(pid).ok_or(ProcError::ProcessNotFound(pid))?;
                Ok(vec![node])
            }
            None => Ok(self
                .default_roots()
                .iter()
                .filter_map(|&pid| self.build(pid))
                .collect()),
        }
    }
}
