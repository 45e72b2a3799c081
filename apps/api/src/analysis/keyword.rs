//! Offline keyword analyzer. Fast, deterministic, no LLM call.
//!
//! Algorithm:
//! 1. Tokenize the job description; drop stopwords and tokens shorter than 2 chars.
//! 2. Keep the `MAX_KEYWORDS` most frequent tokens (ties broken alphabetically).
//! 3. A keyword present in the résumé is a strength, otherwise a gap
//!    (core when it appears at least `CORE_FREQUENCY` times in the job description).
//! 4. match_score = matched / keywords × 100

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;

use crate::analysis::analyzer::{
    GapImportance, MatchAnalysis, MatchAnalyzer, SkillGap, Strength,
};
use crate::analysis::dashboard::ScoreBand;
use crate::errors::AppError;

const MAX_KEYWORDS: usize = 15;
const CORE_FREQUENCY: u32 = 2;
const MAX_QUESTIONS: usize = 3;

const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "etc", "for", "from",
    "good", "have", "in", "is", "it", "job", "of", "on", "or", "our", "role", "strong",
    "team", "that", "the", "their", "this", "to", "we", "will", "with", "work", "years",
    "you", "your",
];

pub struct KeywordMatchAnalyzer;

#[async_trait]
impl MatchAnalyzer for KeywordMatchAnalyzer {
    async fn analyze(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<MatchAnalysis, AppError> {
        Ok(compute_keyword_match(job_description, resume_text))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

fn compute_keyword_match(job_description: &str, resume_text: &str) -> MatchAnalysis {
    let keywords = keyword_inventory(job_description);
    let resume_tokens: HashSet<String> = tokenize(resume_text).collect();

    if keywords.is_empty() {
        return MatchAnalysis {
            strengths_analysis: vec![],
            skill_gaps: vec![],
            interview_questions: vec![],
            overall_suggestion: "No keywords found in the job description; cannot assess fit."
                .to_string(),
            match_score: 0,
        };
    }

    let mut strengths = Vec::new();
    let mut gaps = Vec::new();
    for (keyword, frequency) in &keywords {
        if resume_tokens.contains(keyword) {
            strengths.push(Strength {
                skill: keyword.clone(),
                relevance: format!("Mentioned {frequency}× in the job description"),
            });
        } else {
            gaps.push(SkillGap {
                skill: keyword.clone(),
                importance: if *frequency >= CORE_FREQUENCY {
                    GapImportance::Core
                } else {
                    GapImportance::Bonus
                },
            });
        }
    }

    let match_score = ((strengths.len() as f64 / keywords.len() as f64) * 100.0).round() as u8;

    MatchAnalysis {
        interview_questions: build_questions(&strengths, &gaps),
        overall_suggestion: build_suggestion(match_score, &gaps),
        strengths_analysis: strengths,
        skill_gaps: gaps,
        match_score,
    }
}

/// Most frequent job-description tokens, highest frequency first.
fn keyword_inventory(text: &str) -> Vec<(String, u32)> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_default() += 1;
    }
    let mut keywords: Vec<(String, u32)> = counts.into_iter().collect();
    // BTreeMap iteration is alphabetical and sort_by is stable
    keywords.sort_by(|a, b| b.1.cmp(&a.1));
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Lower-cased word tokens. `+`, `#` and inner `.` are kept so "c++", "c#" and
/// "node.js" survive.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

fn build_questions(strengths: &[Strength], gaps: &[SkillGap]) -> Vec<String> {
    let mut questions: Vec<String> = strengths
        .iter()
        .take(2)
        .map(|s| format!("Walk us through a project where you relied on {}.", s.skill))
        .collect();
    if let Some(gap) = gaps.iter().find(|g| g.importance == GapImportance::Core) {
        questions.push(format!(
            "This role uses {} heavily. How would you get productive with it?",
            gap.skill
        ));
    }
    questions.truncate(MAX_QUESTIONS);
    questions
}

fn build_suggestion(score: u8, gaps: &[SkillGap]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.skill.as_str()).collect();
    match ScoreBand::for_score(score) {
        ScoreBand::Strong => {
            "Strong fit. Keep the résumé focused on the matching experience.".to_string()
        }
        ScoreBand::Fair => format!(
            "Moderate fit ({score}/100). Add evidence for: {}.",
            top_gaps.join(", ")
        ),
        ScoreBand::Weak => format!(
            "Low fit ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Backend engineer. Rust and PostgreSQL required; Rust async experience \
                      with Tokio. Kafka is a plus. PostgreSQL tuning.";

    #[test]
    fn test_tokenize_keeps_language_names() {
        let tokens: Vec<String> = tokenize("C++, C# and Node.js (5 years)").collect();
        assert_eq!(tokens, vec!["c++", "c#", "node.js"]);
    }

    #[test]
    fn test_inventory_orders_by_frequency_then_name() {
        let inventory = keyword_inventory(JD);
        assert_eq!(inventory[0], ("postgresql".to_string(), 2));
        assert_eq!(inventory[1], ("rust".to_string(), 2));
        assert!(inventory.iter().all(|(k, _)| k != "and" && k != "is"));
    }

    #[test]
    fn test_full_overlap_scores_100() {
        let analysis = compute_keyword_match("Rust Tokio", "I write Rust services on Tokio");
        assert_eq!(analysis.match_score, 100);
        assert!(analysis.skill_gaps.is_empty());
        assert!(analysis.overall_suggestion.contains("Strong fit"));
    }

    #[test]
    fn test_gaps_are_ranked_by_frequency() {
        let analysis = compute_keyword_match(JD, "Rust developer, Tokio, async");
        let core: Vec<&str> = analysis
            .skill_gaps
            .iter()
            .filter(|g| g.importance == GapImportance::Core)
            .map(|g| g.skill.as_str())
            .collect();
        assert_eq!(core, vec!["postgresql"]);
        assert!(analysis
            .skill_gaps
            .iter()
            .any(|g| g.skill == "kafka" && g.importance == GapImportance::Bonus));
        assert!(analysis.match_score < 100);
        assert!(analysis
            .interview_questions
            .iter()
            .any(|q| q.contains("postgresql")));
    }

    #[test]
    fn test_empty_description_scores_zero() {
        let analysis = compute_keyword_match("  ", "Rust");
        assert_eq!(analysis.match_score, 0);
        assert!(analysis.strengths_analysis.is_empty());
    }

    #[tokio::test]
    async fn test_backend_label_is_keyword() {
        let analyzer = KeywordMatchAnalyzer;
        assert_eq!(analyzer.backend(), "keyword");
        let analysis = analyzer.analyze("Rust", "Rust").await.unwrap();
        assert_eq!(analysis.match_score, 100);
    }
}
