use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobhunter::analysis::{KeywordMatchAnalyzer, LlmMatchAnalyzer, MatchAnalyzer};
use jobhunter::config::{AnalyzerKind, Config};
use jobhunter::db::{create_pool, init_schema};
use jobhunter::llm_client::{self, LlmClient};
use jobhunter::routes::build_router;
use jobhunter::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Hunter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    let analyzer = build_analyzer(&config)?;
    info!(
        "Match analyzer: {} (page window size {})",
        analyzer.backend(),
        config.page_window_size.get()
    );

    let state = AppState {
        db,
        config: config.clone(),
        analyzer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_analyzer(config: &Config) -> Result<Arc<dyn MatchAnalyzer>> {
    match config.analyzer {
        AnalyzerKind::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the LLM analyzer")?;
            let llm = LlmClient::new(api_key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmMatchAnalyzer(llm)))
        }
        AnalyzerKind::Keyword => Ok(Arc::new(KeywordMatchAnalyzer)),
    }
}
