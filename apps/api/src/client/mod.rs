//! Job browser, the data-loading side of pagination.
//!
//! `JobBrowser` turns navigation and filter intents into loads through a
//! pluggable [`JobSource`], and only applies the response belonging to the most
//! recent request. Calls may overlap; an older response that lands late is
//! dropped instead of rendering an out-of-order window.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::job::{JobListQuery, JobRow, JobStatus, StatusFilter};
use crate::pagination::{
    ChangePage, LoadTicket, Navigation, PageController, PageWindow, PaginationError, WindowSize,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jobs API returned status {0}")]
    Status(u16),

    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// The part of a listing response the browser needs.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<JobRow>,
    pub total_jobs_count: u64,
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_page(&self, query: &JobListQuery) -> Result<JobPage, ClientError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpJobSource
// ────────────────────────────────────────────────────────────────────────────

/// Reads listings from a running API over HTTP.
#[derive(Clone)]
pub struct HttpJobSource {
    client: Client,
    base_url: String,
}

impl HttpJobSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_page(&self, query: &JobListQuery) -> Result<JobPage, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/jobs", self.base_url))
            .query(&query_pairs(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

/// Query-string pairs for a listing request. Keyword and status are omitted
/// when they do not filter anything.
pub fn query_pairs(query: &JobListQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
    ];
    if let Some(keyword) = &query.filter.keyword {
        pairs.push(("keyword", keyword.clone()));
    }
    if let StatusFilter::Only(status) = query.filter.status {
        pairs.push(("status", status.to_string()));
    }
    pairs
}

// ────────────────────────────────────────────────────────────────────────────
// JobBrowser
// ────────────────────────────────────────────────────────────────────────────

/// A page that was loaded and applied: its rows and the window to render.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub jobs: Vec<JobRow>,
    pub total_jobs_count: u64,
    pub window: PageWindow,
}

pub struct JobBrowser<S> {
    source: S,
    controller: Mutex<PageController>,
}

impl<S: JobSource> JobBrowser<S> {
    pub fn new(source: S, limit: u32, window_size: WindowSize) -> Result<Self, ClientError> {
        Ok(Self {
            source,
            controller: Mutex::new(PageController::new(limit, window_size)?),
        })
    }

    pub async fn window(&self) -> PageWindow {
        self.controller.lock().await.window()
    }

    /// Loads the current page again (initial load, or after a status change).
    pub async fn refresh(&self) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.reload();
        self.load(ticket).await
    }

    /// Follows a click on the rendered window. Disabled controls, hidden pages
    /// and the page already shown load nothing and return `Ok(None)`.
    pub async fn navigate(&self, navigation: Navigation) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = {
            let mut controller = self.controller.lock().await;
            let Some(change) = controller.window().resolve(navigation) else {
                return Ok(None);
            };
            controller.request(change)?
        };
        match ticket {
            Some(ticket) => self.load(ticket).await,
            None => Ok(None),
        }
    }

    /// Jumps straight to `target`, validated against the known page count.
    pub async fn go_to(&self, target: u32) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.request(ChangePage { target })?;
        match ticket {
            Some(ticket) => self.load(ticket).await,
            None => Ok(None),
        }
    }

    pub async fn search(&self, keyword: &str) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.set_keyword(keyword);
        self.load(ticket).await
    }

    pub async fn filter_status(
        &self,
        status: Option<JobStatus>,
    ) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.set_status(status);
        self.load(ticket).await
    }

    pub async fn set_limit(&self, limit: u32) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.set_limit(limit)?;
        self.load(ticket).await
    }

    pub async fn clear_filters(&self) -> Result<Option<LoadedPage>, ClientError> {
        let ticket = self.controller.lock().await.clear_filters();
        self.load(ticket).await
    }

    /// Fetches without holding the controller lock, then applies if still current.
    async fn load(&self, ticket: LoadTicket) -> Result<Option<LoadedPage>, ClientError> {
        debug!(
            "Loading page {} (ticket {})",
            ticket.query.page, ticket.sequence
        );
        let page = self.source.fetch_page(&ticket.query).await?;

        let window = self
            .controller
            .lock()
            .await
            .apply(&ticket, page.total_jobs_count);

        Ok(window.map(|window| LoadedPage {
            jobs: page.jobs,
            total_jobs_count: page.total_jobs_count,
            window,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{extract::Query, routing::get, Json, Router};
    use chrono::Utc;
    use serde_json::{json, Value};

    use super::*;
    use crate::models::job::JobFilter;

    fn job(id: i32) -> JobRow {
        JobRow {
            id,
            title: format!("Engineer #{id}"),
            company: "Acme".to_string(),
            location: None,
            experience: None,
            education: None,
            salary_range: None,
            job_url: format!("https://jobs.example.com/{id}"),
            source_website: None,
            posting_date: None,
            industry: None,
            job_description: None,
            status: JobStatus::Unfollowed.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// In-memory source. Pages listed in `slow_pages` take longer to answer.
    struct FakeSource {
        total: u64,
        slow_pages: Vec<u32>,
    }

    #[async_trait]
    impl JobSource for FakeSource {
        async fn fetch_page(&self, query: &JobListQuery) -> Result<JobPage, ClientError> {
            let delay = if self.slow_pages.contains(&query.page) {
                500
            } else {
                10
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let first = (query.page - 1) * query.limit + 1;
            let jobs = (first..first + query.limit)
                .take_while(|id| u64::from(*id) <= self.total)
                .map(|id| job(id as i32))
                .collect();
            Ok(JobPage {
                jobs,
                total_jobs_count: self.total,
            })
        }
    }

    fn browser(total: u64, slow_pages: Vec<u32>) -> JobBrowser<FakeSource> {
        JobBrowser::new(FakeSource { total, slow_pages }, 10, WindowSize::default()).unwrap()
    }

    #[test]
    fn test_query_pairs_omit_unfiltered_fields() {
        let pairs = query_pairs(&JobListQuery::default());
        assert_eq!(
            pairs,
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );

        let query = JobListQuery {
            page: 2,
            limit: 20,
            filter: JobFilter {
                keyword: Some("rust".to_string()),
                status: StatusFilter::Only(JobStatus::Applied),
            },
        };
        let pairs = query_pairs(&query);
        assert!(pairs.contains(&("keyword", "rust".to_string())));
        assert!(pairs.contains(&("status", "applied".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_then_navigate() {
        let browser = browser(95, vec![]);
        let first = browser.refresh().await.unwrap().unwrap();
        assert_eq!(first.jobs.len(), 10);
        assert_eq!(first.window.page_numbers(), vec![1, 2, 3, 4, 5, 10]);

        let next = browser.navigate(Navigation::Next).await.unwrap().unwrap();
        assert_eq!(next.window.current_page, Some(2));
        assert_eq!(next.jobs[0].id, 11);

        let last = browser.navigate(Navigation::Page(10)).await.unwrap().unwrap();
        assert_eq!(last.jobs.len(), 5);
        assert!(!last.window.next_enabled);
        assert!(browser.navigate(Navigation::Next).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_page_and_out_of_range_jump() {
        let browser = browser(200, vec![]);
        browser.refresh().await.unwrap();
        // page 12 sits behind the ellipsis
        assert!(browser.navigate(Navigation::Page(12)).await.unwrap().is_none());
        assert!(matches!(
            browser.go_to(21).await,
            Err(ClientError::Pagination(_))
        ));
        let page = browser.go_to(12).await.unwrap().unwrap();
        assert_eq!(page.window.current_page, Some(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_is_dropped() {
        let browser = Arc::new(browser(200, vec![3]));
        browser.refresh().await.unwrap();

        let slow = {
            let browser = Arc::clone(&browser);
            tokio::spawn(async move { browser.go_to(3).await })
        };
        // let the slow request issue its ticket first
        tokio::time::sleep(Duration::from_millis(1)).await;
        let fast = browser.go_to(5).await.unwrap().unwrap();
        assert_eq!(fast.window.current_page, Some(5));

        assert!(slow.await.unwrap().unwrap().is_none());
        assert_eq!(browser.window().await.current_page, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_going_back_to_shown_page_beats_slow_load() {
        let browser = Arc::new(browser(200, vec![5]));
        browser.refresh().await.unwrap();

        let slow = {
            let browser = Arc::clone(&browser);
            tokio::spawn(async move { browser.go_to(5).await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        // page 1 is still rendered while page 5 is loading
        let back = browser.go_to(1).await.unwrap().unwrap();
        assert_eq!(back.window.current_page, Some(1));
        assert_eq!(back.jobs[0].id, 1);

        assert!(slow.await.unwrap().unwrap().is_none());
        assert_eq!(browser.window().await.current_page, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_resets_to_first_page() {
        let browser = browser(200, vec![]);
        browser.refresh().await.unwrap();
        browser.go_to(7).await.unwrap();
        let page = browser.search("engineer").await.unwrap().unwrap();
        assert_eq!(page.window.current_page, Some(1));
    }

    #[tokio::test]
    async fn test_http_source_against_local_server() {
        async fn list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            let page: u32 = params["page"].parse().unwrap();
            let status = params.get("status").cloned().unwrap_or_default();
            Json(json!({
                "jobs": [{
                    "id": page,
                    "title": format!("status={status}"),
                    "company": "Acme",
                    "job_url": "https://jobs.example.com/1",
                    "status": "applied",
                    "created_at": "2024-05-01T00:00:00Z",
                    "updated_at": "2024-05-01T00:00:00Z"
                }],
                "page": page,
                "limit": 10,
                "total_jobs_count": 42,
                "total_pages": 5
            }))
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/api/jobs", get(list));
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let source = HttpJobSource::new(format!("http://{addr}/"));
        let query = JobListQuery {
            page: 3,
            limit: 10,
            filter: JobFilter {
                keyword: None,
                status: StatusFilter::Only(JobStatus::Applied),
            },
        };
        let page = source.fetch_page(&query).await.unwrap();
        assert_eq!(page.total_jobs_count, 42);
        assert_eq!(page.jobs[0].id, 3);
        assert_eq!(page.jobs[0].title, "status=applied");
        assert_eq!(page.jobs[0].location, None);
    }
}
