//! procscope process introspection library
//!
//! This library reads a Linux `/proc`-style process table and turns one
//! point-in-time snapshot of it into structured data: flat per-process
//! records, a parent/child process forest, or the set of processes whose
//! name contains a pattern.
//!
//! # Features
//!
//! - **Race-tolerant reads**: processes that exit mid-scan are silently omitted
//! - **Bounded I/O**: every pseudo-file read is capped
//! - **Robust parsing**: command names containing `)` or spaces, NUL-separated argv
//! - **Configurable root**: point the engine at any directory laid out like `/proc`
//!
//! # Usage
//!
//! ```rust,no_run
//! use procscope::process::{
//!     build_list, enumerate_pids, ListOptions, ParentChildMap, ProcFs, TreeBuilder,
//!     DEFAULT_MAX_TREE_DEPTH,
//! };
//!
//! let fs = ProcFs::default();
//! let pids = enumerate_pids(fs.root())?;
//!
//! let records = build_list(&fs, &pids, ListOptions::default());
//! println!("{}", procscope::output::to_json(&records, false)?);
//!
//! let map = ParentChildMap::build(&fs, &pids, false);
//! let forest = TreeBuilder::new(&fs, &map, DEFAULT_MAX_TREE_DEPTH).build_forest(None)?;
//! println!("{}", procscope::output::to_json(&forest, true)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod output;
pub mod process;

// Re-export main types for convenience
pub use error::ProcError;
pub use process::{KillReport, ProcFs, ProcessRecord, ProcessTreeNode};
