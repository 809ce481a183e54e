//! Tree command implementation.
//!
//! Prints the process forest, or the single tree below a given PID.

use procscope::output::to_json;
use procscope::process::{enumerate_pids, ParentChildMap, TreeBuilder};
use tracing::info;

use crate::config::Config;

/// Prints the process forest as a JSON array of trees.
pub fn command_tree(pid: Option<u32>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let fs = config.proc_fs();

    // Fail before scanning anything if the requested root is not there.
    if let Some(target) = pid {
        if !fs.process_exists(target) {
            return Err(procscope::ProcError::ProcessNotFound(target).into());
        }
    }

    let pids = enumerate_pids(fs.root())?;
    let map = ParentChildMap::build(&fs, &pids, config.parallel_reads());
    let forest = TreeBuilder::new(&fs, &map, config.max_tree_depth()).build_forest(pid)?;
    info!("Built {} top-level trees", forest.len());

    println!("{}", to_json(&forest, config.pretty())?);
    Ok(())
}
