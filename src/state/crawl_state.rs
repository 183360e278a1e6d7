use crate::state::{ExtractedRecord, PageState};
use crate::url::{matches_domain, normalize_url, CanonicalUrl};
use crate::GleanError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// Why a candidate URL was refused by admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Canonical URL does not contain the crawl domain
    OutOfDomain,
    /// URL is already reserved (in flight) or visited
    AlreadySeen,
    /// URL was discovered deeper than the maximum exploration depth
    DepthExceeded,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfDomain => "out_of_domain",
            Self::AlreadySeen => "already_seen",
            Self::DepthExceeded => "depth_exceeded",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The URL was reserved and may be fetched
    Admitted { url: CanonicalUrl, depth: u32 },
    /// The URL must not be fetched; nothing was recorded
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Everything one crawl run knows about the pages it has seen
///
/// The state only grows during a run: URLs are added to the sets, records are
/// appended to pages, nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// Pages whose fetch completed successfully
    visited: HashSet<CanonicalUrl>,

    /// Every admitted URL, from the moment of admission onwards
    in_flight_or_visited: HashSet<CanonicalUrl>,

    /// Extracted records per page, in extraction order
    results: BTreeMap<CanonicalUrl, Vec<ExtractedRecord>>,

    /// Depth at which each admitted URL was discovered
    depth_of: HashMap<CanonicalUrl, u32>,

    /// Lifecycle position of each admitted URL
    page_states: HashMap<CanonicalUrl, PageState>,
}

impl CrawlState {
    /// Creates an empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether a candidate URL may be fetched, reserving it if so
    ///
    /// # Decision Order
    ///
    /// 1. Normalize the candidate
    /// 2. Reject if it does not contain `domain` (substring match)
    /// 3. Reject if it is already in flight or visited
    /// 4. Reject if `current_depth > max_depth`
    /// 5. Otherwise reserve it and record its depth
    ///
    /// Check and reservation happen in the same `&mut self` borrow, so callers
    /// holding the state lock get an atomic check-and-mark.
    pub fn admit(
        &mut self,
        candidate_raw: &str,
        domain: &str,
        current_depth: u32,
        max_depth: u32,
    ) -> Admission {
        let url = normalize_url(candidate_raw);

        if !matches_domain(&url, domain) {
            return Admission::Rejected(RejectReason::OutOfDomain);
        }

        if self.in_flight_or_visited.contains(&url) {
            return Admission::Rejected(RejectReason::AlreadySeen);
        }

        if current_depth > max_depth {
            return Admission::Rejected(RejectReason::DepthExceeded);
        }

        self.in_flight_or_visited.insert(url.clone());
        self.depth_of.insert(url.clone(), current_depth);
        self.page_states.insert(url.clone(), PageState::Admitted);

        Admission::Admitted {
            url,
            depth: current_depth,
        }
    }

    /// Reserves the target of a redirect before it is followed
    ///
    /// A redirect lands on a page of its own, so the target must not already be
    /// reserved and must lie inside the crawl domain. `chain` holds the URLs the
    /// request went through so far; a target that only respells one of them is
    /// the same page and is accepted without a new reservation. Depth is not
    /// checked, the redirect does not move away from the linking page.
    ///
    /// On refusal nothing is recorded.
    pub fn reserve_redirect(
        &mut self,
        target_raw: &str,
        chain: &[Url],
        domain: &str,
    ) -> Result<CanonicalUrl, RejectReason> {
        let url = normalize_url(target_raw);

        if chain.iter().any(|hop| normalize_url(hop.as_str()) == url) {
            return Ok(url);
        }

        if !matches_domain(&url, domain) {
            return Err(RejectReason::OutOfDomain);
        }

        if self.in_flight_or_visited.contains(&url) {
            return Err(RejectReason::AlreadySeen);
        }

        self.in_flight_or_visited.insert(url.clone());
        Ok(url)
    }

    /// Appends a record to the page's result list, creating the list if needed
    pub fn record(&mut self, url: &CanonicalUrl, record: ExtractedRecord) {
        self.results.entry(url.clone()).or_default().push(record);
    }

    /// Marks a page as visited
    pub fn mark_visited(&mut self, url: &CanonicalUrl) {
        self.visited.insert(url.clone());
    }

    /// Moves an admitted URL to its next lifecycle state
    ///
    /// # Errors
    ///
    /// Returns `GleanError::InvalidTransition` if the URL was never admitted or
    /// the move is not part of the lifecycle. The state is left unchanged.
    pub fn transition(&mut self, url: &CanonicalUrl, to: PageState) -> Result<(), GleanError> {
        let from = self
            .page_states
            .get(url)
            .copied()
            .unwrap_or(PageState::Discovered);

        if !from.can_transition_to(to) || from == PageState::Discovered {
            return Err(GleanError::InvalidTransition {
                url: url.to_string(),
                from,
                to,
            });
        }

        self.page_states.insert(url.clone(), to);
        Ok(())
    }

    /// Returns true if the page finished successfully
    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    /// Returns true if the URL has been admitted at any point
    pub fn is_reserved(&self, url: &CanonicalUrl) -> bool {
        self.in_flight_or_visited.contains(url)
    }

    /// Returns the depth the URL was admitted at
    pub fn depth_of(&self, url: &CanonicalUrl) -> Option<u32> {
        self.depth_of.get(url).copied()
    }

    /// Returns the lifecycle state of an admitted URL
    pub fn page_state(&self, url: &CanonicalUrl) -> Option<PageState> {
        self.page_states.get(url).copied()
    }

    /// Returns the aggregated records, keyed by canonical URL
    pub fn results(&self) -> &BTreeMap<CanonicalUrl, Vec<ExtractedRecord>> {
        &self.results
    }

    /// Returns the records collected for one page
    pub fn records_for(&self, url: &CanonicalUrl) -> Option<&[ExtractedRecord]> {
        self.results.get(url).map(Vec::as_slice)
    }

    /// Number of pages marked visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs ever admitted
    pub fn admitted_count(&self) -> usize {
        self.in_flight_or_visited.len()
    }

    /// Total number of records across all pages
    pub fn record_count(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    /// Number of admitted URLs currently in `state`
    pub fn count_in_state(&self, state: PageState) -> usize {
        self.page_states.values().filter(|s| **s == state).count()
    }
}

/// A `CrawlState` shared between worker tasks behind a single mutex
///
/// Every read-modify-write goes through one lock covering the whole state. No
/// method awaits while holding it.
#[derive(Debug, Clone, Default)]
pub struct SharedCrawlState {
    inner: Arc<Mutex<CrawlState>>,
}

impl SharedCrawlState {
    /// Creates a new shared, empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the state for a compound read
    ///
    /// A poisoned lock is recovered: every mutation is a single insert or
    /// append, so a panicking holder cannot leave the state half-written.
    pub fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the admission check and reservation as one critical section
    pub fn admit(
        &self,
        candidate_raw: &str,
        domain: &str,
        current_depth: u32,
        max_depth: u32,
    ) -> Admission {
        self.lock()
            .admit(candidate_raw, domain, current_depth, max_depth)
    }

    /// Boolean form of [`SharedCrawlState::admit`]
    pub fn can_visit(
        &self,
        candidate_raw: &str,
        domain: &str,
        current_depth: u32,
        max_depth: u32,
    ) -> bool {
        self.admit(candidate_raw, domain, current_depth, max_depth)
            .is_admitted()
    }

    /// Runs [`CrawlState::reserve_redirect`] as one critical section
    pub fn reserve_redirect(
        &self,
        target_raw: &str,
        chain: &[Url],
        domain: &str,
    ) -> Result<CanonicalUrl, RejectReason> {
        self.lock().reserve_redirect(target_raw, chain, domain)
    }

    /// Appends one record to a page
    pub fn record(&self, url: &CanonicalUrl, record: ExtractedRecord) {
        self.lock().record(url, record);
    }

    /// Appends a page's records in order under a single lock acquisition
    pub fn record_all(&self, url: &CanonicalUrl, records: impl IntoIterator<Item = ExtractedRecord>) {
        let mut state = self.lock();
        for record in records {
            state.record(url, record);
        }
    }

    /// Marks a page as visited
    pub fn mark_visited(&self, url: &CanonicalUrl) {
        self.lock().mark_visited(url);
    }

    /// Moves an admitted URL to its next lifecycle state
    pub fn transition(&self, url: &CanonicalUrl, to: PageState) -> Result<(), GleanError> {
        self.lock().transition(url, to)
    }

    /// Takes a read-only copy of the current state
    pub fn snapshot(&self) -> CrawlState {
        self.lock().clone()
    }

    /// Consumes the handle, returning the state without copying when possible
    pub fn into_inner(self) -> CrawlState {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => {
                let state = shared.lock().unwrap_or_else(PoisonError::into_inner).clone();
                state
            }
        }
    }
}
