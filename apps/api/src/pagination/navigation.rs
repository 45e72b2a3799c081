use serde::{Deserialize, Serialize};

use crate::pagination::window::{PageEntry, PageWindow};

/// A user intent against a rendered window: a numbered entry or a nav control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "page", rename_all = "snake_case")]
pub enum Navigation {
    Prev,
    Next,
    Page(u32),
}

/// Request to move to `target`. Carries no data and triggers no load by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePage {
    pub target: u32,
}

impl PageWindow {
    /// Resolves a navigation intent into a change-page request.
    ///
    /// Disabled controls and numbers not present in the window resolve to `None`.
    pub fn resolve(&self, navigation: Navigation) -> Option<ChangePage> {
        let current = self.current_page?;
        let target = match navigation {
            Navigation::Prev if self.prev_enabled => {
                current.checked_sub(1).filter(|p| *p >= 1)?
            }
            Navigation::Next if self.next_enabled => current.checked_add(1)?,
            Navigation::Page(number)
                if self.entries.contains(&PageEntry::Page { number }) =>
            {
                number
            }
            _ => return None,
        };
        Some(ChangePage { target })
    }
}
