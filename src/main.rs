//! procscope - version 0.1.0
//!
//! Process table introspection with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_killall, command_list, command_tree};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr; stdout carries only command output.
fn setup_logging(config: &Config, args: &Args) {
    let level = args
        .log_level
        .or_else(|| config.log_level())
        .unwrap_or(LogLevel::Warn);

    let filter = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    debug!("Logging initialized with level: {:?}", level);
}

/// Sizes the global rayon pool used for parallel reads.
fn setup_thread_pool(config: &Config) {
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }
}

fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let command = match &args.command {
        Some(command) => command,
        None => {
            Args::command().print_help()?;
            std::process::exit(2);
        }
    };

    match command {
        Commands::List {
            base_address_policy,
            skip_unresolved,
        } => command_list(
            base_address_policy.map(Into::into),
            *skip_unresolved,
            config,
        ),
        Commands::Tree { pid } => command_tree(*pid, config),
        Commands::Killall {
            pattern,
            dry_run,
            report,
        } => command_killall(pattern, *dry_run, *report, config),
        Commands::Check => command_check(config),
        Commands::Config {
            output,
            format,
            commented,
        } => command_config(output.clone(), format.clone(), *commented),
    }
}

/// Main application entry point.
fn main() {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        return;
    }

    if args.show_config {
        if let Err(e) = show_config(&config, args.config_format.clone()) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config, &args);
    setup_thread_pool(&config);
    if let Some(path) = &args.config {
        info!("Loaded configuration from: {}", path.display());
    }
    info!("Using process root {:?}", config.proc_root);

    if let Err(e) = run(&args, &config) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
