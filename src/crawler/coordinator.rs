//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Admitting the seed URL
//! - Running a bounded pool of fetch workers
//! - Coordinating fetching, extraction, and link admission
//! - Detecting quiescence and collecting statistics

use crate::config::Config;
use crate::crawler::extractor::TagSelector;
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::crawler::scheduler::{CrawlTask, Scheduler};
use crate::output::CrawlStatistics;
use crate::state::{Admission, CrawlState, PageState, RejectReason, SharedCrawlState};
use crate::{GleanError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Everything a worker task needs to process one page
///
/// Shared by `Arc` between the coordinator and all workers.
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    tags: TagSelector,
    state: SharedCrawlState,
    domain: String,
    max_depth: u32,
}

/// What a worker hands back to the coordinator once its page is done
#[derive(Debug, Default)]
struct PageOutcome {
    /// Links admitted from this page, in document order
    admitted: Vec<CrawlTask>,

    /// Reasons for every link that was refused
    rejected: Vec<RejectReason>,
}

/// Final result of a crawl run
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The crawl state at quiescence
    pub state: CrawlState,

    /// Run statistics
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: String,
    context: Arc<CrawlContext>,
    scheduler: Scheduler,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(GleanError)` - The tag list or HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        // Redirect hops are admitted against the same state as links
        let state = SharedCrawlState::new();
        let fetcher = HttpFetcher::new(config, state.clone())?;
        Self::build(config, Arc::new(fetcher), state)
    }

    /// Creates a coordinator around any `Fetcher`
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        Self::build(config, fetcher, SharedCrawlState::new())
    }

    fn build(config: &Config, fetcher: Arc<dyn Fetcher>, state: SharedCrawlState) -> Result<Self> {
        let tags = TagSelector::parse(&config.tags)?;

        let context = CrawlContext {
            fetcher,
            tags,
            state,
            domain: config.domain.clone(),
            max_depth: config.max_exploration_depth,
        };

        Ok(Self {
            seed: config.base_url(),
            context: Arc::new(context),
            scheduler: Scheduler::new(config.concurrency),
            stats: CrawlStatistics::new(),
        })
    }

    /// Returns a handle to the live crawl state
    pub fn state(&self) -> SharedCrawlState {
        self.context.state.clone()
    }

    /// Runs the crawl until no work is queued and no fetch is outstanding
    ///
    /// This is the core crawling logic that:
    /// 1. Admits the seed at depth 0
    /// 2. Spawns workers while the pool has free slots
    /// 3. Queues the links each finished worker admitted
    /// 4. Stops at quiescence
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let start_time = Instant::now();
        tracing::info!("Starting crawl of {} from {}", self.context.domain, self.seed);

        self.admit_seed()?;

        let mut workers: JoinSet<Result<PageOutcome>> = JoinSet::new();
        let mut pages_finished: u64 = 0;

        loop {
            while let Some(task) = self.scheduler.next_task(workers.len()) {
                let context = Arc::clone(&self.context);
                workers.spawn(process_page(context, task));
            }

            let joined = match workers.join_next().await {
                Some(joined) => joined,
                None => {
                    tracing::info!("Queue is empty and no fetch is outstanding, crawl complete");
                    break;
                }
            };

            match joined {
                Ok(Ok(outcome)) => {
                    for reason in outcome.rejected {
                        self.stats.record_rejection(reason);
                    }
                    for task in outcome.admitted {
                        self.scheduler.push(task);
                    }
                }
                Ok(Err(e)) => tracing::error!("Error processing page: {}", e),
                Err(e) => tracing::error!("{}", GleanError::from(e)),
            }

            pages_finished += 1;

            // Progress reporting every 10 pages
            if pages_finished % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = pages_finished as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} queued, {} in flight, {:.2} pages/sec",
                    pages_finished,
                    self.scheduler.len(),
                    workers.len(),
                    rate
                );
            }
        }

        // Workers are gone, so the state normally comes back without a copy
        let Coordinator {
            context, mut stats, ..
        } = self;
        let state = match Arc::try_unwrap(context) {
            Ok(context) => context.state.into_inner(),
            Err(context) => context.state.snapshot(),
        };

        stats.elapsed = start_time.elapsed();
        stats.absorb_state(&state);

        tracing::info!(
            "Crawl completed: {} pages visited, {} records extracted in {:?}",
            stats.pages_visited,
            stats.records_extracted,
            stats.elapsed
        );

        Ok(CrawlOutcome { state, stats })
    }

    /// Submits the seed URL through admission
    fn admit_seed(&mut self) -> Result<()> {
        let seed_url = Url::parse(&self.seed)?;

        match self.context.state.admit(
            &self.seed,
            &self.context.domain,
            0,
            self.context.max_depth,
        ) {
            Admission::Admitted { url, .. } => {
                self.scheduler.push(CrawlTask::seed(seed_url, url));
                Ok(())
            }
            Admission::Rejected(reason) => Err(GleanError::SeedRejected {
                url: self.seed.clone(),
                reason,
            }),
        }
    }
}

/// Fetches one page and processes the response
///
/// On success the page's records are appended, its links go through
/// admission at the next depth and the page is marked visited. On failure the
/// page ends in `Failed` and stays reserved.
async fn process_page(context: Arc<CrawlContext>, task: CrawlTask) -> Result<PageOutcome> {
    let state = &context.state;
    state.transition(&task.canonical, PageState::Fetching)?;
    tracing::info!("Visiting: {}", task.url);

    let result = context.fetcher.fetch(&task.url, task.referer.as_ref()).await;
    let is_html = result.is_html();

    match result {
        FetchResult::Success {
            final_url,
            status_code,
            content_type,
            body,
        } => {
            tracing::debug!(
                "Fetched {} (status {}, content type '{}')",
                final_url,
                status_code,
                content_type
            );

            let parsed = if is_html {
                parse_page(&body, &final_url, &context.tags)
            } else {
                tracing::debug!("Skipping non-HTML content at {}", task.url);
                ParsedPage::default()
            };

            state.record_all(&task.canonical, parsed.records);
            state.transition(&task.canonical, PageState::Extracted)?;

            let outcome = admit_links(&context, &task, parsed.links);

            state.mark_visited(&task.canonical);
            state.transition(&task.canonical, PageState::Visited)?;
            tracing::info!("Finished scraping content for: {}", task.url);

            Ok(outcome)
        }

        FetchResult::HttpError { status_code } => {
            tracing::warn!("Failed to fetch {}: HTTP {}", task.url, status_code);
            state.transition(&task.canonical, PageState::Failed)?;
            Ok(PageOutcome::default())
        }

        FetchResult::NetworkError { error } => {
            tracing::warn!("Failed to fetch {}: {}", task.url, error);
            state.transition(&task.canonical, PageState::Failed)?;
            Ok(PageOutcome::default())
        }
    }
}

/// Runs every discovered link through admission at the next depth
fn admit_links(context: &CrawlContext, parent: &CrawlTask, links: Vec<Url>) -> PageOutcome {
    let mut outcome = PageOutcome::default();
    let depth = parent.depth.saturating_add(1);

    for link in links {
        match context
            .state
            .admit(link.as_str(), &context.domain, depth, context.max_depth)
        {
            Admission::Admitted { url, depth } => {
                outcome
                    .admitted
                    .push(CrawlTask::child(link, url, depth, &parent.url));
            }
            Admission::Rejected(reason) => {
                tracing::debug!("Not following {}: {}", link, reason);
                outcome.rejected.push(reason);
            }
        }
    }

    outcome
}

/// Runs a complete crawl with the HTTP fetcher
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::Config;
/// use sumi_glean::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default()).await?;
/// println!("{} pages", outcome.stats.pages_visited);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome> {
    Coordinator::new(config)?.run().await
}
