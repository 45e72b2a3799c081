//! Axum route handler for résumé match analysis.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{MatchAnalysis, ScoreDashboard};
use crate::errors::AppError;
use crate::jobs::repository;
use crate::resume::{parse_resume, ResumeFormat};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub analysis_id: Uuid,
    pub job_id: i32,
    pub resume_file_name: String,
    pub backend: &'static str,
    #[serde(flatten)]
    pub analysis: MatchAnalysis,
    pub dashboard: ScoreDashboard,
}

struct UploadedResume {
    file_name: String,
    bytes: Bytes,
}

/// POST /api/jobs/:id/match
///
/// Multipart upload (field `resume`). Extracts the résumé text and analyses it
/// against the job's description.
pub async fn handle_match(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let upload = read_resume_field(multipart, state.config.max_resume_bytes).await?;

    let job = repository::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let job_description = job
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            AppError::UnprocessableEntity(format!("Job {job_id} has no description to match against"))
        })?
        .to_string();

    let file_name = upload.file_name.clone();
    let resume_text = tokio::task::spawn_blocking(move || {
        parse_resume(&upload.file_name, &upload.bytes)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Résumé parsing task failed: {e}")))??;

    let analysis = state
        .analyzer
        .analyze(&job_description, &resume_text)
        .await?;
    let dashboard = ScoreDashboard::from(&analysis);
    let analysis_id = Uuid::new_v4();

    info!(
        "Match analysis {analysis_id}: job={job_id}, backend={}, score={}",
        state.analyzer.backend(),
        analysis.match_score
    );

    Ok(Json(MatchResponse {
        analysis_id,
        job_id,
        resume_file_name: file_name,
        backend: state.analyzer.backend(),
        analysis,
        dashboard,
    }))
}

async fn read_resume_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadedResume, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            return read_file(field, max_bytes).await;
        }
    }
    Err(AppError::Validation(format!(
        "multipart field '{RESUME_FIELD}' is required"
    )))
}

async fn read_file(field: Field<'_>, max_bytes: usize) -> Result<UploadedResume, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    ResumeFormat::from_file_name(&file_name)?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read résumé upload: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("résumé file is empty".to_string()));
    }
    if bytes.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "résumé file exceeds {max_bytes} bytes"
        )));
    }
    Ok(UploadedResume { file_name, bytes })
}
