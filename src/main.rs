use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use wired_people::cli::{handle_command, Cli, DEFAULT_LOG_FILTER};
use wired_people::context::AppContext;
use wired_people::core::ConfigManager;

fn init_logging(json: bool) {
    // Logs go to stderr so command output stays pipeable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let mut config = ConfigManager::load()?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(session) = cli.session {
        config = config.with_session_path(session);
    }

    info!("Environment: {}", config.environment);
    info!("API: {}", config.api.api_url);
    info!("Session: {}", config.session_path.display());

    let context = AppContext::build(config).await?;
    handle_command(cli.command, context).await
}
