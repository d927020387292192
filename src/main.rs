use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nusa_ocr::{
    build_router,
    config::Config,
    ingestion::document_processing::DocumentProcessor,
    llm::{gemini::GeminiConfig, CompletionClient, GeminiClient},
    ocr::engine::create_engine,
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "nusa-ocr", version, about = "Document OCR and field extraction service")]
struct Cli {
    /// Override the PORT environment variable
    #[arg(long)]
    port: Option<u16>,

    /// Validate configuration and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nusa_ocr=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    if cli.check_config {
        info!("Configuration OK");
        info!("  OCR engine: {:?}", config.ocr_engine);
        info!("  Gemini model: {}", config.gemini_model);
        info!("  Listen address: {}", config.server_address());
        return Ok(());
    }

    let engine = create_engine(&config)?;
    let llm: Arc<dyn CompletionClient> = Arc::new(GeminiClient::new(GeminiConfig::from(&config))?);

    if !engine.is_available().await {
        warn!(
            "OCR engine {} is not reachable yet; requests will fail until it is",
            engine.name()
        );
    }

    info!("OCR engine: {}", engine.name());
    info!("AI processor: {}", llm.name());

    let processor = DocumentProcessor::new(engine, llm, &config);
    let address = config.server_address();
    let state = Arc::new(AppState { config, processor });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("NUSA AI OCR Service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
