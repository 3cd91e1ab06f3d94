//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Billable session report generator.
///
/// Reads a log of `HH:MM:SS <customer> Start|End` lines and prints, per
/// customer in order of first appearance, the number of sessions and the
/// total billable seconds.
#[derive(Debug, Parser)]
#[command(name = "fairbill", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Calendar date the log's times of day belong to (defaults to today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// The session log to report on.
    pub log: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_and_log_path() {
        let cli = Cli::try_parse_from([
            "fairbill",
            "--json",
            "--date",
            "2024-06-24",
            "-c",
            "custom.toml",
            "sessions.log",
        ])
        .unwrap();

        assert!(cli.json);
        assert!(!cli.verbose);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 6, 24));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.log, PathBuf::from("sessions.log"));
    }

    #[test]
    fn requires_log_path() {
        assert!(Cli::try_parse_from(["fairbill"]).is_err());
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["fairbill", "--date", "24/06/2024", "x.log"]).is_err());
    }
}
