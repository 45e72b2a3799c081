//! Match analysis: compares a résumé against a job description.
//!
//! `AppState` holds an `Arc<dyn MatchAnalyzer>`, chosen at startup:
//! `LlmMatchAnalyzer` (default) or the offline `KeywordMatchAnalyzer`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::analysis::prompts::{MATCH_ANALYSIS_PROMPT_TEMPLATE, MATCH_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

// ────────────────────────────────────────────────────────────────────────────
// Output data models (shared across analyzer backends)
// ────────────────────────────────────────────────────────────────────────────

/// A résumé skill or experience that directly serves the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub skill: String,
    pub relevance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapImportance {
    #[serde(alias = "required", alias = "core_requirement")]
    Core,
    #[serde(alias = "plus", alias = "nice_to_have")]
    Bonus,
}

/// A skill the job asks for that the résumé does not show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub importance: GapImportance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    #[serde(default)]
    pub strengths_analysis: Vec<Strength>,
    #[serde(default)]
    pub skill_gaps: Vec<SkillGap>,
    #[serde(default)]
    pub interview_questions: Vec<String>,
    #[serde(default)]
    pub overall_suggestion: String,
    /// 0 – 100
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u8,
}

/// Accepts any JSON number and clamps it into 0..=100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("match_score must be finite"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait MatchAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<MatchAnalysis, AppError>;

    /// "llm" or "keyword", echoed to clients.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmMatchAnalyzer(pub LlmClient);

#[async_trait]
impl MatchAnalyzer for LlmMatchAnalyzer {
    async fn analyze(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<MatchAnalysis, AppError> {
        let prompt = build_prompt(job_description, resume_text);
        let analysis: MatchAnalysis = self
            .0
            .call_json(&prompt, MATCH_ANALYSIS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Match analysis failed: {e}")))?;

        info!(
            "LLM match analysis: score={}, strengths={}, gaps={}",
            analysis.match_score,
            analysis.strengths_analysis.len(),
            analysis.skill_gaps.len()
        );
        Ok(analysis)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_prompt(job_description: &str, resume_text: &str) -> String {
    MATCH_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description.trim())
        .replace("{resume_text}", resume_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;

    #[test]
    fn test_prompt_embeds_both_documents() {
        let prompt = build_prompt("  Senior Rust engineer ", "Jane: Rust, Tokio");
        assert!(prompt.contains("<job_description>\nSenior Rust engineer\n</job_description>"));
        assert!(prompt.contains("<resume>\nJane: Rust, Tokio\n</resume>"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_model_reply_deserializes() {
        let reply = r#"```json
        {
          "strengths_analysis": [{"skill": "Rust", "relevance": "Core language of the role"}],
          "skill_gaps": [{"skill": "Kafka", "importance": "core"},
                         {"skill": "Go", "importance": "nice_to_have"}],
          "interview_questions": ["How do you structure async services?"],
          "overall_suggestion": "Lead with the storage engine project.",
          "match_score": 72
        }
        ```"#;
        let analysis: MatchAnalysis = parse_json_reply(reply).unwrap();
        assert_eq!(analysis.match_score, 72);
        assert_eq!(analysis.skill_gaps[0].importance, GapImportance::Core);
        assert_eq!(analysis.skill_gaps[1].importance, GapImportance::Bonus);
        assert_eq!(analysis.strengths_analysis[0].skill, "Rust");
    }

    #[test]
    fn test_score_is_clamped_and_rounded() {
        let high: MatchAnalysis = serde_json::from_str(r#"{"match_score": 140}"#).unwrap();
        assert_eq!(high.match_score, 100);
        let low: MatchAnalysis = serde_json::from_str(r#"{"match_score": -5}"#).unwrap();
        assert_eq!(low.match_score, 0);
        let frac: MatchAnalysis = serde_json::from_str(r#"{"match_score": 66.6}"#).unwrap();
        assert_eq!(frac.match_score, 67);
        assert!(frac.strengths_analysis.is_empty());
    }

    #[test]
    fn test_missing_score_is_an_error() {
        assert!(serde_json::from_str::<MatchAnalysis>(r#"{"overall_suggestion": "x"}"#).is_err());
    }
}
