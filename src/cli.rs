//! CLI arguments and subcommands for procscope.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use procscope::process::BaseAddressPolicy;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Base address resolution policy as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BaseAddressMode {
    /// First mapping of the executable itself at file offset 0
    ExecutableMapping,
    /// Start of the first mapping, whatever backs it
    FirstMapping,
}

impl From<BaseAddressMode> for BaseAddressPolicy {
    fn from(mode: BaseAddressMode) -> Self {
        match mode {
            BaseAddressMode::ExecutableMapping => BaseAddressPolicy::ExecutableMapping,
            BaseAddressMode::FirstMapping => BaseAddressPolicy::FirstMapping,
        }
    }
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procscope",
    about = "Inspect the Linux process table: list, tree and killall",
    long_about = "Inspect the Linux process table: list, tree and killall.\n\n\
                  Reads one snapshot of /proc and prints every process as JSON records, \
                  prints the parent/child process forest, or forcefully terminates every \
                  process whose name contains a pattern.",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Process pseudo-filesystem root
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,

    /// Read ceiling (KB) per pseudo-file
    #[arg(long, global = true)]
    pub max_read_kb: Option<usize>,

    /// Maximum depth a process tree is expanded to
    #[arg(long, global = true)]
    pub max_tree_depth: Option<usize>,

    /// Read per-process attributes in parallel
    #[arg(long, global = true)]
    pub parallel_reads: bool,

    /// Parallel processing threads (0 = auto)
    #[arg(long, global = true)]
    pub parallelism: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every process as a flat JSON record
    List {
        /// How the base load address is resolved
        #[arg(long, value_enum)]
        base_address_policy: Option<BaseAddressMode>,

        /// Drop processes whose executable or working directory cannot be resolved
        #[arg(long)]
        skip_unresolved: bool,
    },

    /// Print the process tree as JSON
    Tree {
        /// Root the output at this PID instead of printing the whole forest
        pid: Option<u32>,
    },

    /// Send SIGKILL to every process whose name contains PATTERN
    Killall {
        /// Case-sensitive substring matched against process names
        pattern: String,

        /// Print matching PIDs instead of signaling them
        #[arg(long)]
        dry_run: bool,

        /// Print a JSON report of signaled, vanished and failed PIDs
        #[arg(long)]
        report: bool,
    },

    /// Validate configuration and /proc accessibility
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
