//! Aggregation state store.
//!
//! Owns every piece of mutable dashboard state: the active [`Filter`], one
//! [`SourceFeed`] per provider, and the global loading/error flags.  Readers
//! take an owned [`Snapshot`]; only [`NewsStore::refresh`] and
//! [`NewsStore::load_more`] write feed state.
//!
//! ## Pagination per source
//!
//! ```text
//!            load_more (has_more)            ok, has_more
//!   Idle ───────────────────────► LoadingMore ──────────► Idle
//!    ▲                               │  │ err
//!    │ refresh                       │  └───────────────► Idle
//!    │                               │ ok, !has_more
//!   Exhausted ◄──────────────────────┘
//! ```
//!
//! Every refresh bumps each source's generation.  A response that arrives
//! for an older generation is dropped, so a slow request can never
//! overwrite the results of a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use crate::source::{Article, FetchError, Filter, FilterPatch, NewsProvider, Page, PerSource, Source};

/// Everything the dashboard knows about one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFeed {
    /// Loaded articles, in arrival order.
    pub articles: Vec<Article>,
    /// 1-based page most recently applied.
    pub page: u32,
    pub has_more: bool,
    pub loading_more: bool,
    /// Last failure for this source, cleared by the next success.
    pub error: Option<String>,
    generation: u64,
}

impl Default for SourceFeed {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            page: 1,
            has_more: true,
            loading_more: false,
            error: None,
            generation: 0,
        }
    }
}

impl SourceFeed {
    pub fn pagination_state(&self) -> PaginationState {
        if self.loading_more {
            PaginationState::LoadingMore
        } else if self.has_more {
            PaginationState::Idle
        } else {
            PaginationState::Exhausted
        }
    }
}

/// Pagination state of a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Idle,
    LoadingMore,
    Exhausted,
}

/// Owned copy of the store state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub filter: Filter,
    pub feeds: PerSource<SourceFeed>,
    /// A full refresh is in flight.
    pub loading: bool,
    /// Most relevant failure message, replaced by each new failure.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All three first pages were applied.
    Applied,
    /// At least one provider failed; every list was cleared.
    Failed,
    /// A newer refresh started before this one settled.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    Appended { count: usize },
    Skipped(SkipReason),
    Failed,
    /// A refresh reset this source while the request was in flight.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Exhausted,
    InFlight,
    Refreshing,
}

/// The three providers plus the state they feed.
pub struct NewsStore {
    providers: PerSource<Arc<dyn NewsProvider>>,
    state: Mutex<Snapshot>,
}

impl NewsStore {
    pub fn new(providers: PerSource<Arc<dyn NewsProvider>>, filter: Filter) -> Self {
        debug_assert!(
            providers.iter().all(|(slot, p)| p.source() == slot),
            "provider registered under the wrong source"
        );
        Self {
            providers,
            state: Mutex::new(Snapshot {
                filter,
                ..Snapshot::default()
            }),
        }
    }

    // The lock is never held across an await, so a poisoned guard still
    // holds consistent state.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub fn filter(&self) -> Filter {
        self.lock().filter.clone()
    }

    pub fn pagination_state(&self, source: Source) -> PaginationState {
        self.lock().feeds[source].pagination_state()
    }

    // -- filters -------------------------------------------------------------

    /// Replace the whole filter.  Does not refetch.
    pub fn set_filter(&self, filter: Filter) {
        self.lock().filter = filter;
    }

    /// Apply a by-field update.  Does not refetch.
    pub fn update_filter(&self, patch: FilterPatch) {
        let mut st = self.lock();
        st.filter = st.filter.patched(patch);
    }

    /// Restore the empty filter and refetch everything.
    pub async fn reset_filters(&self) -> RefreshOutcome {
        self.set_filter(Filter::default());
        self.refresh().await
    }

    // -- fetching ------------------------------------------------------------

    /// Refetch page 1 of every source under the current filter.
    ///
    /// Cursors and `has_more` are reset before any request goes out.  The
    /// three requests run concurrently and the store waits for all of them.
    /// If any fails, nothing from the others is shown.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let (filter, generations) = {
            let mut st = self.lock();
            st.loading = true;
            st.error = None;
            for source in Source::ALL {
                let feed = &mut st.feeds[source];
                feed.generation += 1;
                feed.page = 1;
                feed.has_more = true;
                feed.loading_more = false;
                feed.error = None;
            }
            let generations = PerSource::from_fn(|s| st.feeds[s].generation);
            (st.filter.clone(), generations)
        };
        info!(?filter, "refreshing all sources");

        let (news_api, guardian, nyt) = tokio::join!(
            self.providers.news_api.fetch_page(&filter, 1),
            self.providers.guardian.fetch_page(&filter, 1),
            self.providers.nyt.fetch_page(&filter, 1),
        );

        let mut st = self.lock();
        if Source::ALL
            .iter()
            .any(|s| st.feeds[*s].generation != generations[*s])
        {
            debug!("refresh superseded by a newer one, discarding results");
            return RefreshOutcome::Superseded;
        }
        st.loading = false;

        match (news_api, guardian, nyt) {
            (Ok(news_api), Ok(guardian), Ok(nyt)) => {
                let pages = PerSource {
                    news_api,
                    guardian,
                    nyt,
                };
                for (source, page) in pages {
                    let feed = &mut st.feeds[source];
                    feed.has_more = page.has_more;
                    feed.articles = page.articles;
                }
                info!(
                    news_api = st.feeds.news_api.articles.len(),
                    guardian = st.feeds.guardian.articles.len(),
                    nyt = st.feeds.nyt.articles.len(),
                    "refresh applied"
                );
                RefreshOutcome::Applied
            }
            (news_api, guardian, nyt) => {
                let errors = PerSource {
                    news_api: news_api.err(),
                    guardian: guardian.err(),
                    nyt: nyt.err(),
                };
                apply_refresh_failure(&mut st, errors);
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch the next page of `source` and append it.
    ///
    /// A no-op while a refresh is running, once the source is exhausted, or
    /// while another load-more for the same source is in flight.  Other
    /// sources are never touched.
    #[instrument(skip(self))]
    pub async fn load_more(&self, source: Source) -> LoadMoreOutcome {
        let (filter, next_page, generation) = {
            let mut guard = self.lock();
            let st = &mut *guard;
            let feed = &mut st.feeds[source];
            let skip = if st.loading {
                Some(SkipReason::Refreshing)
            } else if !feed.has_more {
                Some(SkipReason::Exhausted)
            } else if feed.loading_more {
                Some(SkipReason::InFlight)
            } else {
                None
            };
            if let Some(reason) = skip {
                debug!(?reason, "load more skipped");
                return LoadMoreOutcome::Skipped(reason);
            }
            feed.loading_more = true;
            (st.filter.clone(), feed.page + 1, feed.generation)
        };
        debug!(page = next_page, "loading more");

        let result = self.providers[source].fetch_page(&filter, next_page).await;

        let mut guard = self.lock();
        let st = &mut *guard;
        let feed = &mut st.feeds[source];
        if feed.generation != generation {
            debug!(page = next_page, "source was refreshed meanwhile, discarding page");
            return LoadMoreOutcome::Superseded;
        }
        feed.loading_more = false;

        match result {
            Ok(Page { articles, has_more }) => {
                let count = articles.len();
                feed.articles.extend(articles);
                feed.page = next_page;
                feed.has_more = has_more;
                feed.error = None;
                debug!(count, has_more, total = feed.articles.len(), "page appended");
                LoadMoreOutcome::Appended { count }
            }
            Err(e) => {
                warn!(error = %e, page = next_page, "load more failed");
                let message = e.to_string();
                feed.error = Some(message.clone());
                st.error = Some(message);
                LoadMoreOutcome::Failed
            }
        }
    }
}

/// Clear every list, record each source's failure, and surface the first
/// failing source (in [`Source::ALL`] order) as the global error.
fn apply_refresh_failure(st: &mut Snapshot, errors: PerSource<Option<FetchError>>) {
    for (source, error) in errors.iter() {
        let feed = &mut st.feeds[source];
        feed.articles.clear();
        feed.has_more = false;
        feed.error = error.as_ref().map(ToString::to_string);
        if let Some(e) = error {
            warn!(%source, error = %e, "refresh failed");
        }
    }
    st.error = errors
        .iter()
        .find_map(|(_, e)| e.as_ref())
        .map(ToString::to_string);
}
