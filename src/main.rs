// src/main.rs
use clap::Parser;
use lean_portal::{
    connect, serve, AdapterSlot, AppError, AppState, Backend, BackendSettings, CommandLineInput,
    Pages, PortalConfig,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("lean_portal.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}"
    } else {
        "[{l}] {m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the adapter from the environment, checking the connection when asked.
async fn build_adapter(config: &PortalConfig) -> Result<Arc<dyn Backend>, AppError> {
    let settings = BackendSettings::from_env(config.backend)?;
    let backend = connect(&settings, config.request_timeout)?;

    if config.verify_backend {
        log::info!("Verifying {} backend connection", backend.kind());
        backend.verify().await?;
    }

    Ok(backend)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = PortalConfig::resolve(cli)?;

    // A missing backend only disables the data endpoints; the server still starts.
    let adapter = AdapterSlot::from_result(build_adapter(&config).await);
    if let AdapterSlot::Unavailable { reason } = &adapter {
        log::warn!("Backend unavailable, data endpoints will answer 503: {}", reason);
    }

    let state = Arc::new(AppState::new(adapter, Pages::new()?));
    serve(&config.bind_addr, state).await
}
