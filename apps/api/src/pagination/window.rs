//! Page-window calculator.
//!
//! Derives the bounded run of page numbers shown to a user, with the first
//! and last pages pinned and ellipses marking the gaps. Pure arithmetic: no
//! I/O, no shared state, so identical inputs always yield identical windows.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationError;

pub const DEFAULT_WINDOW_SIZE: u32 = 5;

/// Maximum count of numbered entries in the centred run. Always odd and ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WindowSize(u32);

impl WindowSize {
    pub fn new(size: u32) -> Result<Self, PaginationError> {
        if size == 0 || size % 2 == 0 {
            return Err(PaginationError::InvalidArgument(format!(
                "window size must be an odd integer >= 1, got {size}"
            )));
        }
        Ok(Self(size))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    fn half(self) -> u32 {
        self.0 / 2
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_SIZE)
    }
}

impl<'de> Deserialize<'de> for WindowSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        WindowSize::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Current position within a paged result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PageState {
    /// Builds a state from a raw page request and a total count, clamping the
    /// page into range. `limit` must already be validated as non-zero.
    pub fn from_total(requested_page: i64, total_count: u64, limit: u32) -> Self {
        let total_pages = total_pages(total_count, limit);
        Self {
            current_page: clamp_page(requested_page, total_pages),
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

/// `ceil(total_count / limit)`, saturating at `u32::MAX`. A zero limit yields no pages.
pub fn total_pages(total_count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn clamp_page(page: i64, total_pages: u32) -> u32 {
    if page <= 1 || total_pages == 0 {
        return 1;
    }
    u32::try_from(page).unwrap_or(u32::MAX).min(total_pages)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageEntry {
    Page { number: u32 },
    Ellipsis,
}

impl PageEntry {
    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageEntry::Page { number } => Some(*number),
            PageEntry::Ellipsis => None,
        }
    }
}

/// The ellipsis-annotated sequence of page numbers shown at one time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub entries: Vec<PageEntry>,
    /// Clamped current page. `None` when there are no pages at all.
    pub current_page: Option<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageWindow {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            current_page: None,
            prev_enabled: false,
            next_enabled: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selectable page numbers in display order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.entries.iter().filter_map(PageEntry::page_number).collect()
    }
}

/// Computes the page window for `current_page` out of `total_pages`.
///
/// `current_page` is clamped into `[1, total_pages]` first, so out-of-range
/// requests never produce out-of-range numbers.
pub fn compute_window(current_page: i64, total_pages: u32, window_size: WindowSize) -> PageWindow {
    if total_pages == 0 {
        return PageWindow::empty();
    }

    let current = clamp_page(current_page, total_pages);
    let size = window_size.get();

    let mut start = current.saturating_sub(window_size.half()).max(1);
    let end = start.saturating_add(size - 1).min(total_pages);
    if end - start + 1 < size {
        start = end.saturating_sub(size - 1).max(1);
    }

    let mut entries = Vec::with_capacity(size as usize + 4);
    if start > 1 {
        entries.push(PageEntry::Page { number: 1 });
        if start > 2 {
            entries.push(PageEntry::Ellipsis);
        }
    }
    entries.extend((start..=end).map(|number| PageEntry::Page { number }));
    if end < total_pages {
        if end < total_pages - 1 {
            entries.push(PageEntry::Ellipsis);
        }
        entries.push(PageEntry::Page {
            number: total_pages,
        });
    }

    PageWindow {
        entries,
        current_page: Some(current),
        prev_enabled: current > 1,
        next_enabled: current < total_pages,
    }
}

impl PageState {
    pub fn window(&self, window_size: WindowSize) -> PageWindow {
        compute_window(i64::from(self.current_page), self.total_pages, window_size)
    }
}
