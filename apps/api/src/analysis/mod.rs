// Résumé ↔ job match analysis.
// All LLM calls go through llm_client; the keyword backend never touches the network.

pub mod analyzer;
pub mod dashboard;
pub mod handlers;
pub mod keyword;
pub mod prompts;

pub use analyzer::{LlmMatchAnalyzer, MatchAnalysis, MatchAnalyzer};
pub use dashboard::ScoreDashboard;
pub use keyword::KeywordMatchAnalyzer;
