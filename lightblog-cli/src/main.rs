//! # lightblog CLI
//!
//! Command-line front end for a lightblog article directory.

mod commands;
mod view;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lightblog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, env = "LIGHTBLOG_CONFIG", default_value = "lightblog.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles, newest first
    List {
        /// Only articles carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List every tag in use
    Tags {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a single article
    Show {
        /// Article slug
        slug: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Html)]
        format: ShowFormat,
    },

    /// Parse every article and report the ones that were skipped
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the collection whenever the version marker changes
    Watch,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ShowFormat {
    Html,
    Raw,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::List { tag, json } => commands::list_articles(&cli.config, tag.as_deref(), json),
        Commands::Tags { json } => commands::list_tags(&cli.config, json),
        Commands::Show { slug, format } => commands::show_article(&cli.config, &slug, format),
        Commands::Check { json } => commands::check_articles(&cli.config, json),
        Commands::Watch => commands::watch_articles(&cli.config).await,
    }
}
