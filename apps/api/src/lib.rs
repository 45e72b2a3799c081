//! Job Hunter API: job listings with filtered paging, per-job status tracking
//! and résumé ↔ job match analysis.

pub mod analysis;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod models;
pub mod pagination;
pub mod resume;
pub mod routes;
pub mod state;
