use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::MatchAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable match analyzer. Default: LlmMatchAnalyzer. Swap via MATCH_ANALYZER env.
    pub analyzer: Arc<dyn MatchAnalyzer>,
}
