use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, ErrorKind};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use quakelog::report::{self, ReportStyle};
use quakelog::{input, ResultSet, TracingDiagnostics};

mod cli;
mod config_file;

use cli::Cli;
use config_file::ConfigFile;

fn main() -> ExitCode {
    let cli = process_args_with_config();

    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.log_json {
                // Keep stderr as JSON lines
                tracing::error!(error = %format!("{:#}", e), "quakelog failed");
            } else {
                eprintln!("quakelog: Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let workers = cli.worker_count();
    tracing::info!(file = %cli.file.display(), workers, "analyzing log");

    if !cli.no_validate && !cli.reads_stdin() {
        input::validate_log_file(&cli.file)?;
    }

    let reader = input::open_log(&cli.file)?;
    let started = Instant::now();
    let records = quakelog::analyze_reader(reader, workers, &TracingDiagnostics)
        .with_context(|| format!("Failed to analyze {}", cli.file.display()))?;
    tracing::info!(
        games = records.len(),
        total_kills = records.total_kills(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "log analyzed"
    );

    emit_report(cli, &records, cli.report_style())
}

fn emit_report(cli: &Cli, records: &ResultSet, style: ReportStyle) -> Result<()> {
    match &cli.output {
        Some(path) => report::write_report_file(path, records, style)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => match report::write_report(records, io::stdout().lock(), style) {
            // Downstream pager or head closed the pipe; nothing left to do
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            other => other.context("Failed to write report to stdout"),
        },
    }
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }

    install_panic_hook();
}

/// Route panic reports through the subscriber instead of raw stderr
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));
}

/// Extract --config-file argument from raw args
fn extract_config_file_arg(args: &[String]) -> Option<String> {
    args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "--config-file" {
            args.get(i + 1).cloned()
        } else {
            arg.strip_prefix("--config-file=").map(str::to_string)
        }
    })
}

fn process_args_with_config() -> Cli {
    let raw_args: Vec<String> = std::env::args().collect();

    // Handled before clap so it works without an input file
    if raw_args.iter().any(|arg| arg == "--show-config") {
        ConfigFile::show_config();
        std::process::exit(0);
    }

    let processed_args = if raw_args.iter().any(|arg| arg == "--ignore-config") {
        raw_args
    } else {
        let config_file_path = extract_config_file_arg(&raw_args);
        match ConfigFile::load_with_custom_path(config_file_path.as_deref())
            .and_then(|config_file| config_file.process_args(raw_args))
        {
            Ok(processed) => processed,
            Err(e) => {
                eprintln!("quakelog: Config error: {:#}", e);
                std::process::exit(1);
            }
        }
    };

    Cli::parse_from(processed_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_extract_config_file_arg() {
        let args: Vec<String> = ["quakelog", "--config-file", "custom.ini", "games.log"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(extract_config_file_arg(&args), Some("custom.ini".to_string()));
        assert_eq!(extract_config_file_arg(&args[..2]), None);
    }

    #[test]
    fn test_extract_config_file_arg_with_equals() {
        let args: Vec<String> = ["quakelog", "--config-file=custom.ini", "games.log"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(extract_config_file_arg(&args), Some("custom.ini".to_string()));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panic_hook_logs_through_subscriber() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();

        install_panic_hook();
        let result = tracing::subscriber::with_default(subscriber, || {
            std::panic::catch_unwind(|| panic!("segment exploded"))
        });
        let _ = std::panic::take_hook();

        assert!(result.is_err());
        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let entry: serde_json::Value = serde_json::from_str(logged.lines().next().unwrap()).unwrap();
        assert_eq!(entry["level"], "ERROR");
        assert!(entry["fields"]["panic"].as_str().unwrap().contains("segment exploded"));
    }
}
