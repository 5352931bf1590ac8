use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lexdesk::infrastructure::{AppConfig, ConfigLoader};
use lexdesk::presentation::{App, Cli};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let loader = match cli.args.config.as_deref().and_then(std::path::Path::parent) {
        Some(dir) => ConfigLoader::with_dir(dir.to_path_buf()),
        None => ConfigLoader::new()?,
    };
    let mut config = loader.load_config(cli.args.config.as_deref())?;
    config.merge_with_args(cli.args.clone());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(&config)?;

    info!(version = lexdesk::VERSION, api = %config.api.base_url, "Starting Lexdesk");

    let app = App::new(&config, cli.yes)?;
    app.run(cli.command).await
}
