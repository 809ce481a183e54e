//! Configuration management for procscope.
//!
//! This module handles loading, merging, and validating configuration from an
//! optional file and CLI arguments. It supports YAML, JSON, and TOML formats.
//! No file is ever loaded unless one is named with `--config`.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use procscope::process::{
    BaseAddressPolicy, ListOptions, ProcFs, DEFAULT_MAX_READ_KB, DEFAULT_MAX_TREE_DEPTH,
    DEFAULT_PROC_ROOT, MAX_TREE_DEPTH_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound accepted for `max_read_kb`.
pub const MAX_READ_KB_LIMIT: usize = 4096;

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Process table access
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "max-read-kb")]
    pub max_read_kb: Option<usize>,

    // Query behavior
    #[serde(alias = "base-address-policy")]
    pub base_address_policy: Option<BaseAddressPolicy>,
    #[serde(alias = "max-tree-depth")]
    pub max_tree_depth: Option<usize>,
    /// Drop list records without a resolvable exe/cwd
    #[serde(alias = "skip-unresolved")]
    pub skip_unresolved: Option<bool>,

    // Performance tuning
    #[serde(alias = "parallel-reads")]
    pub parallel_reads: Option<bool>,
    pub parallelism: Option<usize>,

    // Output
    pub pretty: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            max_read_kb: Some(DEFAULT_MAX_READ_KB),
            base_address_policy: Some(BaseAddressPolicy::ExecutableMapping),
            max_tree_depth: Some(DEFAULT_MAX_TREE_DEPTH),
            skip_unresolved: Some(false),
            parallel_reads: Some(false),
            parallelism: None,
            pretty: Some(false),
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    /// Reader over the configured process root.
    pub fn proc_fs(&self) -> ProcFs {
        let root = self
            .proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT));
        let max_read_kb = self.max_read_kb.unwrap_or(DEFAULT_MAX_READ_KB);
        ProcFs::new(root, max_read_kb * 1024)
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            base_address_policy: self.base_address_policy.unwrap_or_default(),
            skip_unresolved: self.skip_unresolved.unwrap_or(false),
            parallel: self.parallel_reads.unwrap_or(false),
        }
    }

    pub fn max_tree_depth(&self) -> usize {
        self.max_tree_depth.unwrap_or(DEFAULT_MAX_TREE_DEPTH)
    }

    pub fn parallel_reads(&self) -> bool {
        self.parallel_reads.unwrap_or(false)
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(false)
    }

    /// Log level from the config file, if it names a valid one.
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
            .as_deref()
            .and_then(|s| LogLevel::from_str(s, true).ok())
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(root) = &cfg.proc_root {
        if root.as_os_str().is_empty() {
            return Err("proc_root must not be empty".into());
        }
    }

    if let Some(kb) = cfg.max_read_kb {
        if kb == 0 || kb > MAX_READ_KB_LIMIT {
            return Err(format!(
                "Invalid max_read_kb {}, expected 1..={}",
                kb, MAX_READ_KB_LIMIT
            )
            .into());
        }
    }

    if let Some(depth) = cfg.max_tree_depth {
        if depth == 0 || depth > MAX_TREE_DEPTH_LIMIT {
            return Err(format!(
                "Invalid max_tree_depth {}, expected 1..={}",
                depth, MAX_TREE_DEPTH_LIMIT
            )
            .into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            )
            .into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(kb) = args.max_read_kb {
        config.max_read_kb = Some(kb);
    }
    if let Some(depth) = args.max_tree_depth {
        config.max_tree_depth = Some(depth);
    }
    if args.parallel_reads {
        config.parallel_reads = Some(true);
    }
    if let Some(threads) = args.parallelism {
        config.parallelism = Some(threads);
    }
    if args.pretty {
        config.pretty = Some(true);
    }

    Ok(config)
}

/// Loads a config file, choosing the format by extension (YAML by default).
/// Keys missing from the file keep their default values.
pub fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

    let loaded: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(merge_defaults(loaded))
}

fn merge_defaults(loaded: Config) -> Config {
    let defaults = Config::default();
    Config {
        proc_root: loaded.proc_root.or(defaults.proc_root),
        max_read_kb: loaded.max_read_kb.or(defaults.max_read_kb),
        base_address_policy: loaded.base_address_policy.or(defaults.base_address_policy),
        max_tree_depth: loaded.max_tree_depth.or(defaults.max_tree_depth),
        skip_unresolved: loaded.skip_unresolved.or(defaults.skip_unresolved),
        parallel_reads: loaded.parallel_reads.or(defaults.parallel_reads),
        parallelism: loaded.parallelism.or(defaults.parallelism),
        pretty: loaded.pretty.or(defaults.pretty),
        log_level: loaded.log_level.or(defaults.log_level),
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.max_read_kb = Some(0);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.max_read_kb = Some(MAX_READ_KB_LIMIT + 1);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.max_tree_depth = Some(0);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.max_tree_depth = Some(2_000_000);
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.max_tree_depth = Some(MAX_TREE_DEPTH_LIMIT);
        assert!(validate_effective_config(&cfg).is_ok());

        let mut cfg = Config::default();
        cfg.log_level = Some("loud".into());
        assert!(validate_effective_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.proc_root = Some(PathBuf::new());
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_yaml_partial_keeps_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("procscope.yaml");
        fs::write(
            &path,
            "max-read-kb: 16\nbase_address_policy: first-mapping\n",
        )
        .expect("Failed to write config");

        let cfg = load_config(&path).expect("config parses");
        assert_eq!(cfg.max_read_kb, Some(16));
        assert_eq!(cfg.base_address_policy, Some(BaseAddressPolicy::FirstMapping));
        assert_eq!(cfg.max_tree_depth, Some(DEFAULT_MAX_TREE_DEPTH));
        assert_eq!(cfg.proc_root, Some(PathBuf::from(DEFAULT_PROC_ROOT)));
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempdir().expect("Failed to create temp dir");

        let json = dir.path().join("c.json");
        fs::write(&json, r#"{"pretty": true, "max_tree_depth": 8}"#).expect("write json");
        let cfg = load_config(&json).expect("json parses");
        assert!(cfg.pretty());
        assert_eq!(cfg.max_tree_depth(), 8);

        let toml_path = dir.path().join("c.toml");
        fs::write(&toml_path, "parallel_reads = true\nparallelism = 4\n").expect("write toml");
        let cfg = load_config(&toml_path).expect("toml parses");
        assert!(cfg.parallel_reads());
        assert_eq!(cfg.parallelism, Some(4));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("procscope.yaml");
        fs::write(&path, "max_read_kb: 16\nproc_root: /from/file\n").expect("write config");

        let args = Args::parse_from([
            "procscope",
            "--config",
            path.to_str().expect("utf8 path"),
            "--max-read-kb",
            "32",
            "list",
        ]);
        let cfg = resolve_config(&args).expect("config resolves");
        assert_eq!(cfg.max_read_kb, Some(32));
        assert_eq!(cfg.proc_root, Some(PathBuf::from("/from/file")));
        assert_eq!(cfg.proc_fs().max_read_bytes(), 32 * 1024);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(load_config(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_render_config_roundtrips_through_yaml() {
        let rendered = render_config(&Config::default(), &ConfigFormat::Yaml).expect("render");
        assert!(rendered.contains("executable-mapping"));
        let parsed: Config = serde_yaml::from_str(&rendered).expect("parse back");
        assert_eq!(parsed.max_read_kb, Some(DEFAULT_MAX_READ_KB));
    }
}
