use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use solace_application::{PipelineOrchestrator, SessionStore};
use solace_core::config::{ProviderKind, SecretConfig};
use solace_core::secret::SecretService;
use solace_core::session::StoreRepository;
use solace_infrastructure::{
    ConfigService, InMemoryStoreRepository, JsonStoreRepository, SecretServiceImpl, SolacePaths,
};
use solace_interaction::build_provider;
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod helper;
mod logging;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "solace")]
#[command(about = "Solace - a gentle support chat in your terminal", long_about = None)]
struct Cli {
    /// Directory holding config, secrets, conversations and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep conversations in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Completion backend: gemini, claude, openai or offline
    #[arg(long)]
    provider: Option<ProviderKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SolacePaths::new(cli.data_dir.as_deref());
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::at(&paths)?,
    };
    let mut config = config_service.get_config()?;
    if let Some(kind) = cli.provider {
        config.provider.kind = kind;
    }

    // --data-dir wins over [storage] data_dir
    let data_paths = match (&cli.data_dir, &config.storage.data_dir) {
        (None, Some(dir)) => SolacePaths::new(Some(dir.as_path())),
        _ => paths.clone(),
    };

    let _log_guard = match data_paths
        .log_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| logging::init(&dir, &config.logging.level))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{}", format!("Logging disabled: {e}").yellow());
            None
        }
    };
    tracing::info!("[Main] Starting solace {}", env!("CARGO_PKG_VERSION"));

    let secrets = match SecretServiceImpl::at(&paths).and_then(|service| service.load_secrets()) {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::warn!("[Main] Secrets unavailable: {}", e);
            eprintln!("{}", format!("Warning: {e}").yellow());
            SecretConfig::default()
        }
    };
    let provider = build_provider(&config.provider, &secrets);

    let repository: Arc<dyn StoreRepository> = if cli.ephemeral {
        tracing::info!("[Main] Ephemeral mode, conversations are not saved");
        Arc::new(InMemoryStoreRepository::new())
    } else {
        let repository = JsonStoreRepository::at(&data_paths)?;
        tracing::info!("[Main] Store file: {}", repository.path().display());
        Arc::new(repository)
    };

    let store = SessionStore::open(repository).with_title_max_chars(config.pipeline.title_max_chars);
    let pipeline = PipelineOrchestrator::new(store, provider).with_settings(&config.pipeline);

    repl::Repl::new(pipeline).run().await?;

    tracing::info!("[Main] Exiting");
    Ok(())
}
