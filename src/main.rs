use github_clickup_relay::error::RelayError;
use github_clickup_relay::logging::{FileLogger, setup_logging};
use github_clickup_relay::{AppState, RelayConfig, api_token_from, build_router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "relay_config.toml";

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

async fn run() -> Result<(), RelayError> {
    // An explicitly named config file must exist; the default one is optional
    let (config_path, required) = match env_var("RELAY_CONFIG") {
        Some(path) => (PathBuf::from(path), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    let config = RelayConfig::load(&config_path, required)?.with_env_overrides(env_var);
    let api_key = api_token_from(env_var)?;

    let file_logger = config.log_dir.clone().map(FileLogger::new);
    let _log_guard = setup_logging(file_logger.as_ref())?;

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::new(config, api_key)?);
    let app = build_router(state.clone());

    info!("Using config at {:?}", config_path);
    info!("Relaying to ClickUp API at {}", state.clickup.base_url());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server running on {}", bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
