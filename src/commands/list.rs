//! List command implementation.
//!
//! Prints one JSON array with a record for every live process.

use procscope::output::to_json;
use procscope::process::{build_list, enumerate_pids, BaseAddressPolicy};
use tracing::info;

use crate::config::Config;

/// Prints every process of one snapshot as a flat JSON record.
pub fn command_list(
    base_address_policy: Option<BaseAddressPolicy>,
    skip_unresolved: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let fs = config.proc_fs();
    let mut opts = config.list_options();
    if let Some(policy) = base_address_policy {
        opts.base_address_policy = policy;
    }
    if skip_unresolved {
        opts.skip_unresolved = true;
    }

    let pids = enumerate_pids(fs.root())?;
    let records = build_list(&fs, &pids, opts);
    info!("Listing {} processes", records.len());

    println!("{}", to_json(&records, config.pretty())?);
    Ok(())
}
