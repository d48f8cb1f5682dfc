use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::registry::ActivationRegistry;
use crate::server::AppState;
use crate::settings::{Settings, SourceKind};
use crate::source::{GoogleSheets, TableSource, Workbook};

mod quiz;
mod registry;
mod runner;
mod server;
mod settings;
mod source;

#[derive(Parser)]
#[command(version, about = "Serves multiple-choice quizzes stored in spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the quiz service (default)
    Serve,
    /// Take a quiz in the terminal
    Take {
        /// Link handed out when the quiz was activated
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => match settings.source {
            SourceKind::Google => {
                let source = GoogleSheets::new(settings.service_account_key()?)
                    .context("could not create Google Sheets client")?;
                serve(source, &settings).await
            }
            SourceKind::Workbook => {
                let source = Workbook::new(settings.workbook_root()?);
                serve(source, &settings).await
            }
        },
        Command::Take { url } => runner::take(&url).await,
    }
}

async fn serve<S: TableSource>(source: S, settings: &Settings) -> Result<()> {
    let registry_path = settings.registry_path();
    let registry = ActivationRegistry::open(&registry_path)
        .await
        .with_context(|| format!("could not open {}", registry_path.display()))?;
    tracing::info!(path = %registry.path().display(), "loaded active quizzes");

    tracing::info!(identity = %source.identity(), "testing source connection");
    source
        .authorize()
        .await
        .context("could not connect to the quiz source")?;
    tracing::info!("source connection established");

    let listener = TcpListener::bind((settings.bind_address.as_str(), settings.port))
        .await
        .with_context(|| format!("could not bind {}:{}", settings.bind_address, settings.port))?;
    tracing::info!(address = %listener.local_addr()?, "server is running");

    let state = AppState {
        source: Arc::new(source),
        registry: Arc::new(registry),
        shuffle_passes: settings.shuffle_passes,
    };
    server::serve(listener, state)
        .await
        .context("server stopped unexpectedly")
}
