mod app;
mod config;
mod error;
mod ui;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(config.log_file.as_deref())?;
    tracing::info!("starting against {}", config.base_url);
    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Sends tracing output to the configured file. Without one, logging stays
/// disabled: the alternate screen owns the terminal.
fn init_tracing(log_file: Option<&str>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cassa_tui=info,store=info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
