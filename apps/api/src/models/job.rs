use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub salary_range: Option<String>,
    pub job_url: String,
    pub source_website: Option<String>,
    pub posting_date: Option<String>,
    pub industry: Option<String>,
    pub job_description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scraped listing as delivered to the ingest endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub job_url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub source_website: Option<String>,
    #[serde(default)]
    pub posting_date: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// Per-job tracking status chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Unfollowed,
    Followed,
    Applied,
    Unsuitable,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Unfollowed,
        JobStatus::Followed,
        JobStatus::Applied,
        JobStatus::Unsuitable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Unfollowed => "unfollowed",
            JobStatus::Followed => "followed",
            JobStatus::Applied => "applied",
            JobStatus::Unsuitable => "unsuitable",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Status filter for listings. `All` (or an empty value) disables filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownStatus> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(StatusFilter::All),
            Some(other) => other.parse().map(StatusFilter::Only),
        }
    }

    pub fn status(&self) -> Option<JobStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

/// Search criteria that survive page changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub status: StatusFilter,
}

impl JobFilter {
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        let keyword = keyword.trim();
        self.keyword = (!keyword.is_empty()).then(|| keyword.to_string());
        self
    }
}

/// Fully resolved listing query: one page of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListQuery {
    pub page: u32,
    pub limit: u32,
    pub filter: JobFilter,
}

impl JobListQuery {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

impl Default for JobListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            filter: JobFilter::default(),
        }
    }
}
