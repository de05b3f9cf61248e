// CLI-specific types and structures
// This module contains the command-line interface definitions and parsing logic

use clap::Parser;
use std::path::PathBuf;

use quakelog::report::ReportStyle;

// CLI structure - contains all command-line arguments and options
#[derive(Parser, Debug)]
#[command(name = "quakelog")]
#[command(about = "Per-match kill reports from Quake 3 Arena server logs")]
#[command(
    long_about = "Per-match kill reports from Quake 3 Arena server logs\n\nThe log is split into matches at every InitGame line, the matches are parsed on a pool of worker threads, and the report lists them in the order they were played.\n\nCOMMON EXAMPLES:\n  quakelog games.log\n  quakelog games.log.gz --workers 4 -o report.json\n  zcat games.log.gz | quakelog - --compact"
)]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Server log to analyze ("-" reads stdin). Gzip and zstd input is detected automatically.
    pub file: PathBuf,

    /// Number of worker threads (default: number of CPUs)
    #[arg(
        short = 'w',
        long = "workers",
        value_parser = parse_worker_count,
        allow_hyphen_values = true,
        help_heading = "Performance Options"
    )]
    pub workers: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", help_heading = "Output Options")]
    pub output: Option<PathBuf>,

    /// Emit the report on a single line
    #[arg(long = "compact", help_heading = "Output Options")]
    pub compact: bool,

    /// Accept files that are not named *.log or do not look like text
    #[arg(long = "no-validate", help_heading = "Input Options")]
    pub no_validate: bool,

    /// Use this config file instead of the default search path
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Do not load any config file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,

    /// Show config precedence and search locations, then exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Logging Options")]
    pub verbose: u8,

    /// Write logs to stderr as JSON lines
    #[arg(long = "log-json", help_heading = "Logging Options")]
    pub log_json: bool,
}

impl Cli {
    pub fn report_style(&self) -> ReportStyle {
        if self.compact {
            ReportStyle::Compact
        } else {
            ReportStyle::Pretty
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == quakelog::input::STDIN_PATH
    }
}

fn parse_worker_count(value: &str) -> Result<usize, String> {
    let count: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    if count < 1 {
        return Err(format!("worker count must be at least 1, got {}", count));
    }
    usize::try_from(count).map_err(|_| format!("worker count {} is too large", count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_worker_count() {
        assert_eq!(parse_worker_count("4"), Ok(4));
        assert!(parse_worker_count("0").unwrap_err().contains("at least 1"));
        assert!(parse_worker_count("-3").unwrap_err().contains("at least 1"));
        assert!(parse_worker_count("many").unwrap_err().contains("whole number"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["quakelog", "games.log"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("games.log"));
        assert!(cli.workers.is_none());
        assert!(cli.worker_count() >= 1);
        assert_eq!(cli.report_style(), ReportStyle::Pretty);
        assert_eq!(cli.log_filter(), "warn");
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_later_arguments_override_earlier_ones() {
        let cli = Cli::try_parse_from(["quakelog", "--workers", "2", "-", "-w", "6", "-vv"]).unwrap();
        assert_eq!(cli.worker_count(), 6);
        assert_eq!(cli.log_filter(), "debug");
        assert!(cli.reads_stdin());
    }

    #[test]
    fn test_negative_worker_count_rejected() {
        assert!(Cli::try_parse_from(["quakelog", "games.log", "--workers", "-1"]).is_err());
    }
}
