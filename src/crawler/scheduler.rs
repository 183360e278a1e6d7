//! Scheduler for managing the crawl work queue
//!
//! This module handles:
//! - The FIFO queue of admitted URLs waiting for a worker
//! - The bound on concurrently running fetches

use crate::url::CanonicalUrl;
use std::collections::VecDeque;
use url::Url;

/// An admitted URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL to fetch, exactly as discovered
    pub url: Url,

    /// Identity the page is tracked and recorded under
    pub canonical: CanonicalUrl,

    /// Link distance from the seed (the seed is 0)
    pub depth: u32,

    /// Page the link was found on; `None` for the seed
    pub referer: Option<Url>,
}

impl CrawlTask {
    /// Creates the task for the seed URL
    pub fn seed(url: Url, canonical: CanonicalUrl) -> Self {
        Self {
            url,
            canonical,
            depth: 0,
            referer: None,
        }
    }

    /// Creates a task for a link found on `parent`
    pub fn child(url: Url, canonical: CanonicalUrl, depth: u32, parent: &Url) -> Self {
        Self {
            url,
            canonical,
            depth,
            referer: Some(parent.clone()),
        }
    }
}

/// Scheduler manages the queue of admitted URLs
///
/// URLs are handed out in admission order. Every URL in the queue has already
/// been reserved by admission, so the queue never holds duplicates.
#[derive(Debug)]
pub struct Scheduler {
    /// Admitted URLs not yet handed to a worker
    queue: VecDeque<CrawlTask>,

    /// Maximum number of fetches running at once
    max_in_flight: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// `max_in_flight` is clamped to at least 1 so the crawl always progresses.
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Adds an admitted URL to the back of the queue
    pub fn push(&mut self, task: CrawlTask) {
        self.queue.push_back(task);
    }

    /// Returns the next URL to fetch if a worker slot is free
    ///
    /// # Arguments
    ///
    /// * `in_flight` - Number of fetches currently running
    pub fn next_task(&mut self, in_flight: usize) -> Option<CrawlTask> {
        if in_flight >= self.max_in_flight {
            return None;
        }
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no URL is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}
