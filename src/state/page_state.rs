/// Page state definitions for tracking crawl progress
///
/// This module defines every state a candidate URL can be in during a crawl and
/// the transitions allowed between them.
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Link has been found on a page but not yet checked for admission
    Discovered,

    /// URL passed admission and is reserved; waiting for a worker
    Admitted,

    /// URL is currently being fetched
    Fetching,

    /// Page body was received and its elements have been extracted
    Extracted,

    // ===== Terminal States =====
    /// Page was fetched and fully processed
    Visited,

    /// Fetch failed (network error or HTTP error status)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited | Self::Failed)
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the transition `self -> next` is part of the lifecycle
    ///
    /// ```text
    /// Discovered -> Admitted -> Fetching -> Extracted -> Visited
    /// Fetching   -> Failed
    /// ```
    ///
    /// A URL refused by admission never gets a state of its own; the refusal
    /// is reported as `Admission::Rejected`.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::Admitted)
                | (Self::Admitted, Self::Fetching)
                | (Self::Fetching, Self::Extracted)
                | (Self::Fetching, Self::Failed)
                | (Self::Extracted, Self::Visited)
        )
    }

    /// Returns a short lowercase name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Admitted => "admitted",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::Visited => "visited",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Discovered,
            Self::Admitted,
            Self::Fetching,
            Self::Extracted,
            Self::Visited,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
