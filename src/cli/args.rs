//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stopwatch - time sessions and keep a history of how long they took
#[derive(Parser, Debug)]
#[command(name = "stopwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the preference store and settings
    #[arg(long, env = "STOPWATCH_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(
        short,
        long,
        env = "STOPWATCH_DEBUG",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub verbose: bool,

    /// Tick interval in milliseconds
    #[arg(
        long,
        default_value_t = 1000,
        hide = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Open the stopwatch screen (default)
    Run,

    /// Print the recorded sessions
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a recorded session by its row number in `history`
    Delete {
        /// Row number as shown by `history`
        row: usize,
    },

    /// Show or change display settings
    Settings {
        /// List the most recent session first
        #[arg(long)]
        newest_first: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["stopwatch"]).unwrap();

        assert_eq!(cli.command, None);
        assert_eq!(cli.tick_ms, 1000);
    }

    #[test]
    fn test_delete_parses_row() {
        let cli = Cli::try_parse_from(["stopwatch", "delete", "3", "--data-dir", "/tmp/sw"]).unwrap();

        assert_eq!(cli.command, Some(Commands::Delete { row: 3 }));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/sw")));
    }

    #[test]
    fn test_settings_flag() {
        let cli = Cli::try_parse_from(["stopwatch", "settings", "--newest-first", "true"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Settings {
                newest_first: Some(true)
            })
        );
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        assert!(Cli::try_parse_from(["stopwatch", "--tick-ms", "0"]).is_err());
    }
}
