/// mcp-terminal: session memory for an LLM-assisted terminal
///
/// Commands:
/// - index: walk a project and ingest its source files (`--wait` to drain)
/// - search-code / search-commands: substring search over the store
/// - log-command: append to the command log
/// - context: bounded bundle of code and commands for a query
/// - recent / status / health
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};

use mcp_terminal::cli::{OutputFormat, OutputWriter, ProgressReporter};
use mcp_terminal::config::{self, AppConfig};
use mcp_terminal::logging::init_logging;
use mcp_terminal::{ServiceError, TerminalContextService};

#[derive(Parser)]
#[command(name = "mcp-terminal")]
#[command(about = "Project indexing and command history for LLM terminal sessions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write logs to this file instead of the rolling log directory
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every eligible file under a project directory
    Index {
        /// Project root (`~` and `$VARS` are expanded)
        project: String,

        /// Wait for the background worker to finish ingesting
        #[arg(short, long)]
        wait: bool,

        /// Give up waiting after this many seconds
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,

        /// Suppress progress output on stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the ingestion status of this process
    Status,

    /// Case-sensitive substring search over indexed file contents
    SearchCode {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Substring search over logged commands, newest first
    SearchCommands {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Append a command to the history
    LogCommand {
        command: String,

        #[arg(short, long, default_value = "")]
        output: String,

        /// Working directory (defaults to the current directory)
        #[arg(long)]
        cwd: Option<String>,

        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        exit_code: i32,
    },

    /// Build a context bundle for a query
    Context {
        query: String,

        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Most recently accessed projects
    Recent {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Store statistics and worker state
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let invalid = e
                .downcast_ref::<ServiceError>()
                .is_some_and(ServiceError::is_invalid_input);
            if invalid {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = config::data_dir()?;
    let _log_guard = init_logging(&config::logs_dir(&data_dir), cli.log.as_deref())?;

    let app_config = AppConfig::load_or_init(&data_dir)?;
    debug!("Data directory: {}", data_dir.display());

    let service = TerminalContextService::open(app_config, &data_dir)?;
    let mut out = OutputWriter::stdout(cli.format);

    match cli.command {
        Commands::Index {
            project,
            wait,
            timeout_secs,
            quiet,
        } => {
            let project = expand_path(&project)?;
            let summary = service.start_indexing(&project)?;

            if wait {
                let mut progress = ProgressReporter::new(summary.files_enqueued, quiet);
                let status = service
                    .watch_until_idle(Duration::from_secs(timeout_secs), |status| {
                        progress.report(status)
                    })
                    .await?;
                progress.complete(&status);
                out.write_value(&status)?;
            } else {
                out.write_value(&summary)?;
            }
        }
        Commands::Status => out.write_value(&service.indexing_status())?,
        Commands::SearchCode { query, limit } => {
            out.write_list(&service.search_code(&query, limit)?)?
        }
        Commands::SearchCommands { query, limit } => {
            out.write_list(&service.search_commands(&query, limit)?)?
        }
        Commands::LogCommand {
            command,
            output,
            cwd,
            exit_code,
        } => {
            let working_dir = match cwd {
                Some(dir) => expand_path(&dir)?,
                None => current_dir()?,
            };
            out.write_value(&service.log_command(&command, &output, &working_dir, exit_code)?)?;
        }
        Commands::Context { query, project } => {
            let project = match project {
                Some(dir) => expand_path(&dir)?,
                None => current_dir()?,
            };
            out.write_value(&service.build_context(&query, &project)?)?;
        }
        Commands::Recent { limit } => out.write_list(&service.recent_projects(limit)?)?,
        Commands::Health => out.write_value(&service.health()?)?,
    }

    service.shutdown();
    info!("Done");
    Ok(())
}

fn expand_path(raw: &str) -> Result<String> {
    let expanded = shellexpand::full(raw).with_context(|| format!("Failed to expand {}", raw))?;
    Ok(expanded.into_owned())
}

fn current_dir() -> Result<String> {
    let dir = std::env::current_dir().context("Cannot read the current directory")?;
    Ok(dir.to_string_lossy().into_owned())
}
