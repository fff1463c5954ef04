//! Command-line parsing for the grid search.
//!
//! The run configuration itself is a token stream (stdin by default); the
//! flags here only control where it comes from and the ambient behaviour.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "gridfd3",
    version,
    about = "Chi-square grid over the tight-orbit semi-amplitudes of a triple system"
)]
pub struct Cli {
    /// Read the run configuration from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Also write the chi-square surface as JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_stdin() {
        let cli = Cli::parse_from(["gridfd3"]);
        assert!(cli.input.is_none());
        assert!(cli.threads.is_none());
        assert!(cli.export.is_none());
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::parse_from(["gridfd3", "-i", "run.in", "-j", "4", "--export", "s.json", "-vv"]);
        assert_eq!(cli.input, Some(PathBuf::from("run.in")));
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.export, Some(PathBuf::from("s.json")));
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
