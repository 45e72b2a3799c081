//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::repository::{self, UpsertOutcome};
use crate::models::job::{
    JobFilter, JobListQuery, JobRow, JobStatus, NewJob, StatusFilter, DEFAULT_PAGE_LIMIT,
    MAX_PAGE_LIMIT,
};
use crate::pagination::{self, PageState, PageWindow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw query string. Numbers arrive as text so malformed values can be
/// reported as invalid arguments instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub keyword: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub page: u32,
    pub limit: u32,
    pub total_jobs_count: u64,
    pub total_pages: u32,
    pub pagination: PageWindow,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LastUpdateResponse {
    pub success: bool,
    pub last_update: Option<String>,
}

/// Requested page (unclamped) plus the resolved filter.
#[derive(Debug, PartialEq)]
struct ListRequest {
    page: i64,
    limit: u32,
    filter: JobFilter,
}

impl ListJobsParams {
    fn resolve(&self) -> Result<ListRequest, AppError> {
        let page = match self.page.as_deref() {
            Some(raw) if !raw.trim().is_empty() => pagination::parse_page(raw)?,
            _ => 1,
        };
        let limit = match self.limit.as_deref() {
            Some(raw) if !raw.trim().is_empty() => pagination::parse_limit(raw, MAX_PAGE_LIMIT)?,
            _ => DEFAULT_PAGE_LIMIT,
        };
        let filter = JobFilter {
            keyword: None,
            status: StatusFilter::parse(self.status.as_deref())?,
        }
        .with_keyword(self.keyword.as_deref().unwrap_or_default());

        Ok(ListRequest {
            page,
            limit,
            filter,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
///
/// One page of jobs plus the page window for the pagination bar. The requested
/// page is clamped into range before the rows are fetched.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let request = params.resolve()?;

    let mut query = JobListQuery {
        page: 1,
        limit: request.limit,
        filter: request.filter,
    };
    let total = repository::count_jobs(&state.db, &query).await?;
    let total = u64::try_from(total).unwrap_or_default();

    let page_state = PageState::from_total(request.page, total, request.limit);
    query.page = page_state.current_page;

    let jobs = if page_state.is_empty() {
        Vec::new()
    } else {
        repository::list_jobs(&state.db, &query).await?
    };

    Ok(Json(JobListResponse {
        jobs,
        page: page_state.current_page,
        limit: request.limit,
        total_jobs_count: total,
        total_pages: page_state.total_pages,
        pagination: page_state.window(state.config.page_window_size),
    }))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<JobRow>, AppError> {
    let job = repository::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// POST /api/jobs/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status: JobStatus = match request.status.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse()?,
        _ => return Err(AppError::Validation("status is required".to_string())),
    };

    if !repository::update_job_status(&state.db, job_id, status).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    info!("Job {job_id} status set to {status}");
    Ok(Json(MessageResponse {
        message: format!("Job {job_id} status updated to {status}"),
    }))
}

/// POST /api/jobs
///
/// Ingest sink for scraped listings. Upserts by `job_url`.
pub async fn handle_upsert_job(
    State(state): State<AppState>,
    Json(job): Json<NewJob>,
) -> Result<Json<UpsertOutcome>, AppError> {
    validate_new_job(&job)?;
    let outcome = repository::upsert_job(&state.db, &job).await?;
    Ok(Json(outcome))
}

/// GET /api/last-update
pub async fn handle_last_update(
    State(state): State<AppState>,
) -> Result<Json<LastUpdateResponse>, AppError> {
    let last_update = repository::get_last_update(&state.db).await?;
    Ok(Json(LastUpdateResponse {
        success: true,
        last_update,
    }))
}

fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    for (field, value) in [
        ("title", &job.title),
        ("company", &job.company),
        ("job_url", &job.job_url),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }
    if !(job.job_url.starts_with("http://") || job.job_url.starts_with("https://")) {
        return Err(AppError::Validation(
            "job_url must be an http(s) URL".to_string(),
        ));
    }
    Ok(())
}
