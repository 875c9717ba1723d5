use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use onboardbot::cli;

#[derive(Parser)]
#[command(name = "onboardbot", version)]
#[command(about = "Conversational onboarding guides built from GitHub READMEs", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot on stdin/stdout, one line per message
    Chat {
        /// User id the messages are attributed to
        #[arg(long, default_value = "local-user")]
        user: String,

        /// Path to config file (defaults to ./onboardbot.toml or ~/.config/onboardbot/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Use the mock LLM client
        #[arg(long)]
        dry_run: bool,

        /// Keep caches in memory only
        #[arg(long)]
        no_cache: bool,
    },
    /// Resolve and print the README used for an app (and optional team)
    Readme {
        app: String,

        #[arg(long)]
        team: Option<String>,

        #[arg(long)]
        config: Option<String>,

        #[arg(long)]
        no_cache: bool,
    },
    /// Build one onboarding guide and print it
    Summarize {
        app: String,

        /// android, ios, backend, frontend, design or marketing
        team: String,

        /// beginner, intermediate or experienced
        #[arg(long, default_value = "beginner")]
        experience: String,

        #[arg(long)]
        config: Option<String>,

        #[arg(long)]
        dry_run: bool,

        #[arg(long)]
        no_cache: bool,
    },
    /// Validate config and credentials
    Check {
        #[arg(long)]
        config: Option<String>,

        /// Also call GitHub and the LLM provider
        #[arg(long)]
        live: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            user,
            config,
            dry_run,
            no_cache,
        } => {
            cli::chat::run(config, user, dry_run, no_cache).await?;
        }
        Commands::Readme {
            app,
            team,
            config,
            no_cache,
        } => {
            cli::readme::run(config, app, team, no_cache).await?;
        }
        Commands::Summarize {
            app,
            team,
            experience,
            config,
            dry_run,
            no_cache,
        } => {
            cli::summarize::run(config, app, team, experience, dry_run, no_cache).await?;
        }
        Commands::Check { config, live } => {
            cli::check::run(config, live).await?;
        }
    }

    Ok(())
}
