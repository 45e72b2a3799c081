//! Page controller: owns the listing position and filters for one consumer.
//!
//! Every state transition that needs data issues a [`LoadTicket`] carrying a
//! monotonic sequence number. Responses are applied only for the latest ticket,
//! so overlapping loads (rapid clicks, slow network) can never render an
//! out-of-order window.

use tracing::debug;

use crate::models::job::{JobFilter, JobListQuery, JobStatus, StatusFilter, DEFAULT_PAGE_LIMIT};
use crate::pagination::navigation::ChangePage;
use crate::pagination::window::{PageState, PageWindow, WindowSize};
use crate::pagination::PaginationError;

/// Permission to load one page. Hand it back to [`PageController::apply`] with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub sequence: u64,
    pub query: JobListQuery,
}

#[derive(Debug, Clone)]
pub struct PageController {
    state: PageState,
    limit: u32,
    filter: JobFilter,
    window_size: WindowSize,
    sequence: u64,
    /// Page requested by the most recent ticket. Equals the current page once
    /// that ticket's response has been applied.
    pending_page: u32,
}

impl PageController {
    pub fn new(limit: u32, window_size: WindowSize) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(Self::with_valid_limit(limit, window_size))
    }

    fn with_valid_limit(limit: u32, window_size: WindowSize) -> Self {
        Self {
            state: PageState {
                current_page: 1,
                total_pages: 0,
            },
            limit,
            filter: JobFilter::default(),
            window_size,
            sequence: 0,
            pending_page: 1,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn window(&self) -> PageWindow {
        self.state.window(self.window_size)
    }

    /// Ticket for the very first load (or a plain refresh of the current page).
    pub fn reload(&mut self) -> LoadTicket {
        self.issue(self.state.current_page)
    }

    /// Validates a change-page request against the known bounds.
    ///
    /// Returns `Ok(None)` when the target is the page the latest ticket asked
    /// for (the page on screen when no load is in flight).
    pub fn request(&mut self, change: ChangePage) -> Result<Option<LoadTicket>, PaginationError> {
        let upper = self.state.total_pages.max(1);
        if change.target == 0 || change.target > upper {
            return Err(PaginationError::InvalidArgument(format!(
                "page {} is outside 1..={upper}",
                change.target
            )));
        }
        if change.target == self.pending_page {
            return Ok(None);
        }
        Ok(Some(self.issue(change.target)))
    }

    pub fn set_keyword(&mut self, keyword: &str) -> LoadTicket {
        self.filter = std::mem::take(&mut self.filter).with_keyword(keyword);
        self.issue(1)
    }

    pub fn set_status(&mut self, status: Option<JobStatus>) -> LoadTicket {
        self.filter.status = status.map_or(StatusFilter::All, StatusFilter::Only);
        self.issue(1)
    }

    pub fn set_limit(&mut self, limit: u32) -> Result<LoadTicket, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        self.limit = limit;
        Ok(self.issue(1))
    }

    pub fn clear_filters(&mut self) -> LoadTicket {
        self.filter = JobFilter::default();
        self.issue(1)
    }

    /// Applies a completed load. Returns `None` if a newer ticket has been
    /// issued since, in which case the response is discarded untouched.
    pub fn apply(&mut self, ticket: &LoadTicket, total_count: u64) -> Option<PageWindow> {
        if ticket.sequence != self.sequence {
            debug!(
                "Discarding stale page response (ticket {}, latest {})",
                ticket.sequence, self.sequence
            );
            return None;
        }
        self.state = PageState::from_total(
            i64::from(self.pending_page),
            total_count,
            ticket.query.limit,
        );
        self.pending_page = self.state.current_page;
        Some(self.window())
    }

    fn issue(&mut self, page: u32) -> LoadTicket {
        self.sequence += 1;
        self.pending_page = page;
        LoadTicket {
            sequence: self.sequence,
            query: JobListQuery {
                page,
                limit: self.limit,
                filter: self.filter.clone(),
            },
        }
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::with_valid_limit(DEFAULT_PAGE_LIMIT, WindowSize::default())
    }
}
