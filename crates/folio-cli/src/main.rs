use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::{AppConfig, Theme};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Typewriter and scroll engines of the folio portfolio page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hero typewriter in the terminal
    Type {
        /// Phrase to cycle (repeatable, defaults to the configured hero phrases)
        #[arg(short = 'p', long = "phrase")]
        phrases: Vec<String>,
        /// Stop after this many full passes over the phrase list
        #[arg(short = 'c', long)]
        cycles: Option<usize>,
    },
    /// Evaluate section highlighting and entrance triggers for a layout file
    Sections {
        /// JSON layout description
        #[arg(short = 'l', long)]
        layout: PathBuf,
        /// Scroll offsets to evaluate, in order
        #[arg(short = 's', long = "scroll", num_args = 1.., allow_negative_numbers = true)]
        scroll: Vec<f64>,
    },
    /// Show or change the colour scheme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// light or dark
        theme: Theme,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Type { phrases, cycles } => {
            commands::typewriter::run(&config, phrases, cycles).await
        }
        Commands::Sections { layout, scroll } => {
            commands::sections::run(&config, &layout, &scroll)
        }
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => commands::theme::show(&config),
            ThemeAction::Toggle => commands::theme::toggle(&mut config),
            ThemeAction::Set { theme } => commands::theme::set(&mut config, theme),
        },
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init => commands::config::init(),
        },
    }
}
