//! Job persistence. Every query is parameterized; keyword input is LIKE-escaped.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::models::job::{JobListQuery, JobRow, JobStatus, NewJob};

const LAST_UPDATE_KEY: &str = "last_update";

/// Outcome of an ingest upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UpsertOutcome {
    pub id: i32,
    pub created: bool,
}

/// Counts the jobs matching the query's filter, ignoring its page.
pub async fn count_jobs(pool: &PgPool, query: &JobListQuery) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM jobs
        WHERE ($1::text IS NULL OR title ILIKE $1 OR company ILIKE $1)
          AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(keyword_pattern(query))
    .bind(query.filter.status.status().map(|s| s.as_str()))
    .fetch_one(pool)
    .await
}

/// Fetches one page of jobs, newest postings first.
pub async fn list_jobs(pool: &PgPool, query: &JobListQuery) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE ($1::text IS NULL OR title ILIKE $1 OR company ILIKE $1)
          AND ($2::text IS NULL OR status = $2)
        ORDER BY posting_date DESC NULLS LAST, id DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(keyword_pattern(query))
    .bind(query.filter.status.status().map(|s| s.as_str()))
    .bind(i64::from(query.limit))
    .bind(query.offset())
    .fetch_all(pool)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: i32) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Sets a job's status. Returns `false` if no job has that id.
pub async fn update_job_status(
    pool: &PgPool,
    job_id: i32,
    status: JobStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE jobs SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts a job or refreshes the descriptive fields of the one with the same URL.
/// Never touches `status`. Bumps the last-update marker in the same transaction.
pub async fn upsert_job(pool: &PgPool, job: &NewJob) -> Result<UpsertOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (id, created): (i32, bool) = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (title, company, location, experience, education, salary_range,
             job_url, source_website, posting_date, industry, job_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (job_url) DO UPDATE SET
            title = EXCLUDED.title,
            company = EXCLUDED.company,
            location = EXCLUDED.location,
            experience = EXCLUDED.experience,
            education = EXCLUDED.education,
            salary_range = EXCLUDED.salary_range,
            source_website = EXCLUDED.source_website,
            posting_date = EXCLUDED.posting_date,
            industry = EXCLUDED.industry,
            job_description = COALESCE(EXCLUDED.job_description, jobs.job_description),
            updated_at = now()
        RETURNING id, (xmax = 0) AS created
        "#,
    )
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.location)
    .bind(&job.experience)
    .bind(&job.education)
    .bind(&job.salary_range)
    .bind(&job.job_url)
    .bind(&job.source_website)
    .bind(&job.posting_date)
    .bind(&job.industry)
    .bind(&job.job_description)
    .fetch_one(&mut *tx)
    .await?;

    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    sqlx::query(
        r#"
        INSERT INTO metadata (meta_key, meta_value) VALUES ($1, $2)
        ON CONFLICT (meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
        "#,
    )
    .bind(LAST_UPDATE_KEY)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "{} job {} ({})",
        if created { "Inserted" } else { "Updated" },
        id,
        job.title
    );
    Ok(UpsertOutcome { id, created })
}

/// Time of the last successful ingest, `None` if nothing was ever ingested.
pub async fn get_last_update(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT meta_value FROM metadata WHERE meta_key = $1")
            .bind(LAST_UPDATE_KEY)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}

fn keyword_pattern(query: &JobListQuery) -> Option<String> {
    query
        .filter
        .keyword
        .as_deref()
        .map(|k| format!("%{}%", escape_like(k)))
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
