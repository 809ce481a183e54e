//! Killall command implementation.
//!
//! Collects every process whose name contains the pattern, then sends each
//! of them SIGKILL.

use procscope::output::to_json;
use procscope::process::{enumerate_pids, find_matches, terminate, NixSignaler};
use tracing::{info, warn};

use crate::config::Config;

/// Forcefully terminates all processes whose name contains `pattern`.
/// Zero matches is not an error.
pub fn command_killall(
    pattern: &str,
    dry_run: bool,
    report: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let fs = config.proc_fs();
    let pids = enumerate_pids(fs.root())?;
    let matches = find_matches(&fs, &pids, pattern, Some(std::process::id()))?;
    info!("{} processes match '{}'", matches.len(), pattern);

    if dry_run {
        println!("{}", to_json(&matches, config.pretty())?);
        return Ok(());
    }

    let outcome = terminate(&matches, &NixSignaler);
    if !outcome.failed.is_empty() {
        warn!(
            "Could not signal {} of {} matching processes",
            outcome.failed.len(),
            matches.len()
        );
    }

    if report {
        println!("{}", to_json(&outcome, config.pretty())?);
    }
    Ok(())
}
