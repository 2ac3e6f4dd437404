use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use sipp_runner::{ProcessRunner, SippConfig, SippRunner};
use sipp_trace::{messages_filter, parse_messages_from_log, Direction, MessageFilter, TraceMessage};

mod logging;
mod output;

use logging::{parse_log_level, setup_logging, LoggingConfig};

/// Inspect SIPp message traces and run SIPp scenarios
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", env = "SIPP_TRACE_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Log span activity
    #[arg(long, global = true)]
    log_spans: bool,

    /// Include source file and line in log records
    #[arg(long, global = true)]
    log_file_info: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the messages of a trace, optionally filtered
    Dump {
        /// Message file written by `sipp -trace_msg -message_file`
        log: PathBuf,

        /// Only messages in this direction (sent, received)
        #[arg(long)]
        direction: Option<Direction>,

        /// Only messages whose start line begins with this token
        #[arg(long)]
        method: Option<String>,

        /// Only responses with this status code
        #[arg(long)]
        status: Option<u32>,

        /// Print JSON instead of the annotated text form
        #[arg(long)]
        json: bool,
    },

    /// One line per message
    Summary {
        log: PathBuf,
    },

    /// Run SIPp with a TOML configuration
    Run {
        #[arg(long, short)]
        config: PathBuf,

        /// Dump the resulting trace when the configuration names a message file
        #[arg(long)]
        dump: bool,
    },
}

impl Cli {
    fn logging_config(&self) -> Result<LoggingConfig> {
        let mut logging = LoggingConfig::new(parse_log_level(&self.log_level)?);
        if self.json_logs {
            logging = logging.with_json();
        }
        if self.log_spans {
            logging = logging.with_spans();
        }
        if self.log_file_info {
            logging = logging.with_file_info();
        }
        Ok(logging)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.logging_config()?)?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Dump {
            log,
            direction,
            method,
            status,
            json,
        } => {
            let filter = MessageFilter {
                direction,
                method,
                status_code: status,
            };
            dump(&log, &filter, json)
        }
        Command::Summary { log } => {
            let messages = load(&log)?;
            println!("{}", output::render_summary(&messages));
            Ok(())
        }
        Command::Run { config, dump: dump_trace } => run(&config, dump_trace).await,
    }
}

fn load(path: &Path) -> Result<Vec<TraceMessage>> {
    parse_messages_from_log(path).with_context(|| format!("Failed to parse {}", path.display()))
}

fn dump(path: &Path, filter: &MessageFilter, json: bool) -> Result<()> {
    let messages = load(path)?;
    let selected: Vec<&TraceMessage> = if filter.is_empty() {
        messages.iter().collect()
    } else {
        messages_filter(&messages, filter)
    };
    debug!("{} of {} messages selected", selected.len(), messages.len());

    if json {
        println!("{}", output::render_json(selected)?);
    } else {
        for message in selected {
            print!("{}", output::render_message(message));
        }
    }
    Ok(())
}

async fn run(config_path: &Path, dump_trace: bool) -> Result<()> {
    let config = SippConfig::load_from_file(config_path)?;
    let outcome = SippRunner::new().run(&config).await?;

    let status = outcome.status().to_string();
    let status = if outcome.is_success() {
        status.green()
    } else {
        status.red()
    };
    println!("{} {}", "command:".bold(), outcome.command_line);
    println!("{} {} ({})", "status:".bold(), status, outcome.exit_code);

    if dump_trace {
        match &config.message_file {
            Some(path) if path.exists() => dump(path, &MessageFilter::new(), false)?,
            Some(path) => println!("no trace written to {}", path.display()),
            None => println!("no message_file configured, nothing to dump"),
        }
    }

    if !outcome.is_success() {
        std::process::exit(outcome.exit_code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_logging_flags() {
        let cli = Cli::try_parse_from([
            "sipp-trace",
            "summary",
            "trace.log",
            "--log-level",
            "debug",
            "--log-spans",
            "--log-file-info",
        ])
        .unwrap();
        let logging = cli.logging_config().unwrap();
        assert_eq!(logging.level, Level::DEBUG);
        assert!(logging.log_spans);
        assert!(logging.file_info);
        assert!(!logging.json);
    }

    #[test]
    fn test_logging_defaults() {
        let cli = Cli::try_parse_from(["sipp-trace", "dump", "trace.log", "--status", "180"]).unwrap();
        let logging = cli.logging_config().unwrap();
        assert!(!logging.log_spans);
        assert!(!logging.file_info);
        match cli.command {
            Command::Dump { status, .. } => assert_eq!(status, Some(180)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
