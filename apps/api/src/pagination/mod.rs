// Pagination: pure page-window arithmetic plus the explicit page state that
// replaces shared mutable globals. Nothing here performs I/O or touches a renderer.

pub mod controller;
pub mod navigation;
pub mod window;

use thiserror::Error;

pub use controller::{LoadTicket, PageController};
pub use navigation::{ChangePage, Navigation};
pub use window::{compute_window, total_pages, PageEntry, PageState, PageWindow, WindowSize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parses a raw page number. Non-numeric input fails fast; numeric but
/// out-of-range values are left for the calculator to clamp.
pub fn parse_page(raw: &str) -> Result<i64, PaginationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PaginationError::InvalidArgument(format!("page must be an integer, got '{raw}'")))
}

/// Parses a page-size limit, which must fall within `1..=max`.
pub fn parse_limit(raw: &str, max: u32) -> Result<u32, PaginationError> {
    let limit = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| PaginationError::InvalidArgument(format!("limit must be an integer, got '{raw}'")))?;
    if limit == 0 || limit > max {
        return Err(PaginationError::InvalidArgument(format!(
            "limit must be between 1 and {max}, got {limit}"
        )));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_accepts_signed_integers() {
        assert_eq!(parse_page("3"), Ok(3));
        assert_eq!(parse_page(" -2 "), Ok(-2));
    }

    #[test]
    fn test_parse_page_rejects_garbage() {
        assert!(matches!(parse_page("abc"), Err(PaginationError::InvalidArgument(_))));
        assert!(parse_page("2.5").is_err());
        assert!(parse_page("").is_err());
    }

    #[test]
    fn test_parse_limit_bounds() {
        assert_eq!(parse_limit("10", 100), Ok(10));
        assert!(parse_limit("0", 100).is_err());
        assert!(parse_limit("101", 100).is_err());
        assert!(parse_limit("-1", 100).is_err());
    }
}
