//! Command-line entry points.

mod args;
mod commands;

pub use args::{Cli, Commands};
pub use commands::{execute, resolve_data_dir};
