//! CLI command implementations for procscope.
//!
//! This module provides implementations for all CLI subcommands:
//! - `list`: Flat process records
//! - `tree`: Process forest
//! - `killall`: Match-and-terminate
//! - `check`: System validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod killall;
pub mod list;
pub mod tree;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use killall::command_killall;
pub use list::command_list;
pub use tree::command_tree;
