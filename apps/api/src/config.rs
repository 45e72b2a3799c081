use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::pagination::WindowSize;

const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Which backend produces match analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    Llm,
    Keyword,
}

impl FromStr for AnalyzerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(AnalyzerKind::Llm),
            "keyword" => Ok(AnalyzerKind::Keyword),
            other => bail!("MATCH_ANALYZER must be 'llm' or 'keyword', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Required only when `analyzer` is `Llm`.
    pub anthropic_api_key: Option<String>,
    pub analyzer: AnalyzerKind,
    pub page_window_size: WindowSize,
    pub max_resume_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let analyzer = match lookup("MATCH_ANALYZER") {
            Some(raw) => raw.parse()?,
            None => AnalyzerKind::Llm,
        };
        let anthropic_api_key = match analyzer {
            AnalyzerKind::Llm => Some(require("ANTHROPIC_API_KEY")?),
            AnalyzerKind::Keyword => lookup("ANTHROPIC_API_KEY"),
        };

        let page_window_size = match lookup("PAGE_WINDOW_SIZE") {
            Some(raw) => {
                let size = raw
                    .parse::<u32>()
                    .context("PAGE_WINDOW_SIZE must be a positive integer")?;
                WindowSize::new(size).context("PAGE_WINDOW_SIZE is invalid")?
            }
            None => WindowSize::default(),
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            anthropic_api_key,
            analyzer,
            page_window_size,
            max_resume_bytes: lookup("MAX_RESUME_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_RESUME_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_RESUME_BYTES),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
