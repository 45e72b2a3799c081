//! Score dashboard view model. Renderers draw this as-is; no HTML here.

use serde::Serialize;

use crate::analysis::analyzer::{GapImportance, MatchAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::Strong,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "Great fit",
            ScoreBand::Fair => "Fair fit",
            ScoreBand::Weak => "Needs work",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "#00c853",
            ScoreBand::Fair => "#ffd600",
            ScoreBand::Weak => "#ff5252",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDashboard {
    pub score: u8,
    pub max_score: u8,
    pub band: ScoreBand,
    pub label: &'static str,
    pub color: &'static str,
    pub core_gap_count: usize,
    pub bonus_gap_count: usize,
}

impl From<&MatchAnalysis> for ScoreDashboard {
    fn from(analysis: &MatchAnalysis) -> Self {
        let band = ScoreBand::for_score(analysis.match_score);
        let core_gap_count = analysis
            .skill_gaps
            .iter()
            .filter(|g| g.importance == GapImportance::Core)
            .count();
        Self {
            score: analysis.match_score,
            max_score: 100,
            band,
            label: band.label(),
            color: band.color(),
            core_gap_count,
            bonus_gap_count: analysis.skill_gaps.len() - core_gap_count,
        }
    }
}
