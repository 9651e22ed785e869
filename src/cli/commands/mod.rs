//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod cancel;
mod config_cmd;
mod jobs;
mod results_cmd;
mod review;
mod serve;
mod submit;
mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "docw")]
#[command(about = "Dashboard and polling client for a document-processing pipeline")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL for this invocation (not persisted)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a document for processing
    Submit {
        /// Document name shown in the dashboard
        doc_name: String,
        /// URL of the document, already reachable by the pipeline
        #[arg(long)]
        input_url: String,
        /// Pipeline config overrides as key=value pairs
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
        /// Watch job progress after submitting
        #[arg(short, long)]
        watch: bool,
    },

    /// List recent jobs
    Jobs {
        /// Maximum number of jobs to list
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Watch a job's progress until it finishes
    Watch {
        /// Job ID to watch
        job_id: String,
        /// Poll interval in seconds (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Request cancellation of a job
    Cancel {
        /// Job ID to cancel
        job_id: String,
    },

    /// Fetch results for a finished job
    Results {
        /// Job ID
        job_id: String,
        /// Print the raw results manifest as JSON
        #[arg(long)]
        json: bool,
        /// Print the integration JSON payload (completed jobs only)
        #[arg(long)]
        integration: bool,
    },

    /// Review pending classifications for a job
    Review {
        /// Job ID
        job_id: String,
        /// Accept every predicted label without prompting
        #[arg(long)]
        approve_all: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Start the web dashboard
    Serve {
        /// Bind address (port, host, or host:port)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a setting (or all settings)
    Get {
        /// Setting key (api_url, request_timeout, poll_interval_secs, review_threshold)
        key: Option<String>,
    },
    /// Persist a setting
    Set { key: String, value: String },
    /// Print the settings file path
    Path,
}

/// Parse arguments and dispatch.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut settings, config_path) = load_settings(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        settings.api_url = Some(url.clone());
    }

    match cli.command {
        Commands::Submit {
            doc_name,
            input_url,
            overrides,
            watch,
        } => submit::cmd_submit(&settings, &doc_name, &input_url, &overrides, watch).await,
        Commands::Jobs { limit } => jobs::cmd_jobs(&settings, limit).await,
        Commands::Watch { job_id, interval } => {
            watch::cmd_watch(&settings, &job_id, interval).await
        }
        Commands::Cancel { job_id } => cancel::cmd_cancel(&settings, &job_id).await,
        Commands::Results {
            job_id,
            json,
            integration,
        } => results_cmd::cmd_results(&settings, &job_id, json, integration).await,
        Commands::Review {
            job_id,
            approve_all,
        } => review::cmd_review(&settings, &job_id, approve_all).await,
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => config_cmd::cmd_get(&settings, key.as_deref()),
            ConfigCommands::Set { key, value } => {
                config_cmd::cmd_set(&settings, &config_path, &key, &value)
            }
            ConfigCommands::Path => config_cmd::cmd_path(&config_path),
        },
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
    }
}
