//! Quiz Sou da Banda CLI
//!
//! Command-line interface for syncing and browsing quiz content.

mod commands;
mod config;
mod display;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use banda_core::content::DEFAULT_CONTENT_URL;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "banda")]
#[command(version, about = "Sync and browse Quiz Sou da Banda content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the content repository
    #[arg(
        long,
        global = true,
        env = "BANDA_CONTENT_URL",
        default_value = DEFAULT_CONTENT_URL
    )]
    content_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize content (download or check for updates) and show the status
    Sync,

    /// Check for new content now
    Update,

    /// Show the last sync status without contacting the server
    Status,

    /// Print questions from the active content
    Questions {
        /// Number of questions
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Only questions of this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List question categories
    Categories,

    /// Remove all cached content
    Clear,

    /// Keep the update schedule running and print status changes
    Watch,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        display::error(&format!("Cannot initialize logging: {}", e));
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("banda=info".parse()?),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quiz-sou-da-banda")
    });

    let config = CliConfig {
        data_dir,
        content_url: cli.content_url,
    };

    match cli.command {
        Commands::Sync => commands::content::sync(&config).await?,
        Commands::Update => commands::content::update(&config).await?,
        Commands::Status => commands::content::status(&config).await?,
        Commands::Questions { count, category } => {
            commands::content::questions(&config, count, category.as_deref()).await?;
        }
        Commands::Categories => commands::content::categories(&config).await?,
        Commands::Clear => commands::content::clear(&config).await?,
        Commands::Watch => commands::content::watch(&config).await?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "banda", &mut io::stdout());
        }
    }

    Ok(())
}
