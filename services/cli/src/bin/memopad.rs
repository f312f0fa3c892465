use cli_lib::{
    adapters::{CommandClipboard, HttpBackend},
    config::Config,
    error::CliError,
    shell::{stdin_lines, Shell, TerminalPrompt},
};
use memopad_core::{App, EditorSettings, Ports};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Memo server at {}", config.api_url);

    // --- 2. Initialize Adapters ---
    let http = Arc::new(HttpBackend::new(&config.api_url, config.http_timeout)?);
    let clipboard = Arc::new(CommandClipboard::new(config.clipboard));
    let input = stdin_lines();
    let prompt = Arc::new(TerminalPrompt::new(input.clone()));

    let ports = Ports {
        backend: http.clone(),
        ocr: http,
        clipboard,
        prompt,
    };
    let settings = EditorSettings {
        autosave: config.autosave,
        autosave_delay: config.autosave_delay,
    };

    // --- 3. Run the Shell ---
    let mut shell = Shell::new(App::new(ports, settings), input);
    shell.run().await?;

    info!("Goodbye.");
    Ok(())
}
