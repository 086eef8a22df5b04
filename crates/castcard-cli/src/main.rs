mod commands;

use std::path::PathBuf;

use castcard_core::AppConfig;
use castcard_neynar::NeynarClient;
use castcard_share::SiteUrls;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "castcard")]
#[command(about = "Farcaster activity card command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a user's engagement totals, rates and top engagers
    Stats { username: String },
    /// Render a user's activity card to a file
    Card {
        username: String,

        /// Output path; defaults to `activity-card-<username>.<format>`
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = CardFormat::Png)]
        format: CardFormat,

        /// Draw placeholder avatars instead of downloading them
        #[arg(long)]
        no_avatars: bool,
    },
    /// Share a user's card: print the compose URL, or the clipboard text
    Share {
        username: String,

        /// Share the way a host app without native sharing does: print the
        /// clipboard text instead of the compose URL
        #[arg(long)]
        clipboard: bool,
    },
    /// Print the link-preview metadata for a user's card
    Metadata {
        username: String,

        /// Use this score instead of fetching the user's activity
        #[arg(long)]
        score: Option<String>,

        /// Print flat `<meta>` name/content pairs instead of JSON
        #[arg(long)]
        flat: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CardFormat {
    Png,
    Svg,
}

impl CardFormat {
    fn extension(self) -> &'static str {
        match self {
            CardFormat::Png => "png",
            CardFormat::Svg => "svg",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = castcard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    let graph = NeynarClient::with_base_url(
        &config.neynar_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.neynar_base_url,
    )?;
    let urls = SiteUrls::new(&config.public_base_url);

    match command {
        Commands::Stats { username } => {
            commands::run_stats(&graph, &username, config.cast_window).await
        }
        Commands::Card {
            username,
            out,
            format,
            no_avatars,
        } => {
            let out = out.unwrap_or_else(|| commands::default_card_path(&username, format));
            commands::run_card(&graph, config, &username, &out, format, no_avatars).await
        }
        Commands::Share {
            username,
            clipboard,
        } => commands::run_share(&graph, &urls, &username, clipboard, config.cast_window).await,
        Commands::Metadata {
            username,
            score,
            flat,
        } => {
            commands::run_metadata(&graph, &urls, &username, score, flat, config.cast_window)
                .await
        }
    }
}
