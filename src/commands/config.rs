//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("procscope.yaml"),
    };

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        eprintln!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# procscope Configuration
# =======================
#
# Process Table Access
# --------------------
# proc_root: /proc             # Root of the process pseudo-filesystem
# max_read_kb: 64              # Read ceiling per pseudo-file (1..=4096)
#
# Query Behavior
# --------------
# base_address_policy: executable-mapping  # or first-mapping
# max_tree_depth: 1024         # Deeper subtrees are cut off with a warning
# skip_unresolved: false       # list: drop processes without exe/cwd
#
# Performance Tuning
# ------------------
# parallel_reads: false        # Read per-process files on a thread pool
# parallelism: null            # Pool threads (null/0 = auto)
#
# Output / Logging
# ----------------
# pretty: false                # Pretty-print JSON
# log_level: "warn"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
