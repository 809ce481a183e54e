//! Check command implementation.
//!
//! Validates configuration and access to the process table.

use nix::unistd::geteuid;
use procscope::process::{
    enumerate_pids, peak_read_bytes, read_record, ParentChildMap, EXE_LINK,
};

use crate::config::{validate_effective_config, Config};

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procscope - System Check");
    println!("===========================");

    let mut all_ok = true;
    let fs = config.proc_fs();

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    // Check process root
    println!("\n📁 Checking {}...", fs.root().display());
    let pids = match enumerate_pids(fs.root()) {
        Ok(pids) if pids.is_empty() => {
            println!("   ❌ No process entries found");
            all_ok = false;
            pids
        }
        Ok(pids) => {
            println!("   ✅ Can enumerate {} process entries", pids.len());
            pids
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
            Vec::new()
        }
    };

    // Check own record
    println!("\n🧾 Checking record parsing...");
    let own_pid = std::process::id();
    match read_record(&fs, own_pid, config.list_options().base_address_policy) {
        Some(record) => {
            println!(
                "   ✅ Own record parsed: state={}, exe={}, base_address={:#x}",
                record.state, record.exe, record.base_address
            );
            if record.base_address == 0 {
                println!("   ⚠️  Base address unresolved for own process");
            }
        }
        None if fs.process_exists(own_pid) => {
            println!("   ❌ Own stat line could not be parsed (PID {})", own_pid);
            all_ok = false;
        }
        None => {
            println!(
                "   ⚠️  Own PID {} not visible under this root (synthetic or foreign root?)",
                own_pid
            );
        }
    }

    // Check hierarchy
    if !pids.is_empty() {
        let map = ParentChildMap::build(&fs, &pids, config.parallel_reads());
        let top_level = map.children_of(0).len();
        if top_level == 0 && map.children_of(1).is_empty() {
            println!("   ⚠️  No top-level processes found under PID 0 or PID 1");
        } else {
            println!(
                "   ✅ Parent/child map built: {} processes, {} top-level",
                map.len(),
                top_level
            );
        }
    }

    // Check privileges
    println!("\n🔐 Checking privileges...");
    if geteuid().is_root() {
        println!("   ✅ Running as root (uid=0)");
    } else {
        println!("   ⚠️  Not running as root - exe/cwd of other users' processes will be empty");
    }
    if fs.read_link(1, EXE_LINK).is_empty() {
        println!("   ⚠️  Cannot resolve exe link of PID 1");
    } else {
        println!("   ✅ Can resolve exe link of PID 1");
    }

    // Read buffer usage
    let ceiling = fs.max_read_bytes() as u64;
    let peak = peak_read_bytes();
    println!("\n📏 Read buffer: peak {} of {} bytes", peak, ceiling);
    if peak >= ceiling {
        println!("   ⚠️  Some reads were truncated - consider raising max_read_kb");
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
