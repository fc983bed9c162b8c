//! List view-state machine for the products table.
//!
//! Owns page, search text (raw and debounced), sort, and selection, and
//! decides when a fetch is needed. Every input that may need the network
//! returns `Option<FetchKey>`: `Some` means the caller must fetch that key and
//! feed the result back through [`ListView::on_fetch_result`]. The view never
//! performs I/O itself.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::debounce::Debouncer;
use super::model::{FetchKey, Product, ProductPage};
use super::paginator::PageWindow;
use super::query_cache::{Lookup, QueryCache};
use super::selection::{HeaderCheck, Selection};
use super::sort::{SortField, SortSpec};
use crate::api::{ApiError, ApiResult};
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Not started, or torn down.
    Idle,
    /// Waiting for the first page; nothing to show yet.
    Loading,
    /// Showing earlier data while another key loads.
    Refreshing,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ListViewOptions {
    pub limit: u32,
    pub debounce: Duration,
    pub stale_after: Duration,
    pub cache_gc: Duration,
}

impl ListViewOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.effective_page_size(),
            debounce: config.search_debounce(),
            stale_after: config.stale_after(),
            cache_gc: config.cache_gc(),
        }
    }
}

impl Default for ListViewOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug)]
pub struct ListView {
    limit: u32,
    page: u32,
    search_input: String,
    search: String,
    debounce: Debouncer<String>,
    sort: SortSpec,
    selection: Selection,
    cache: QueryCache<FetchKey, ProductPage>,
    shown: Option<(FetchKey, Arc<ProductPage>)>,
    latest: Option<FetchKey>,
    status: ListStatus,
}

impl ListView {
    pub fn new(options: ListViewOptions) -> Self {
        Self {
            limit: options.limit.max(1),
            page: 1,
            search_input: String::new(),
            search: String::new(),
            debounce: Debouncer::new(options.debounce),
            sort: SortSpec::default(),
            selection: Selection::default(),
            cache: QueryCache::new(options.stale_after, options.cache_gc),
            shown: None,
            latest: None,
            status: ListStatus::Idle,
        }
    }

    /// Seeds the sort, typically from saved preferences.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Enters the view. Issues the fetch for the current key if needed.
    pub fn start(&mut self, now: Instant) -> Option<FetchKey> {
        self.sync(now, false)
    }

    /// Leaves the view: cancels any pending debounce. Cached pages stay.
    pub fn teardown(&mut self) {
        self.debounce.cancel();
        self.search_input.clone_from(&self.search);
        self.latest = None;
        self.status = ListStatus::Idle;
    }

    /// Records a search keystroke. Resets to page 1 and (re)starts the quiet
    /// window; no fetch happens until [`ListView::tick`] fires it.
    pub fn input_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.page = 1;
        self.debounce.schedule(self.search_input.clone(), now);
    }

    /// Drives the debounce. Call on every timer tick.
    pub fn tick(&mut self, now: Instant) -> Option<FetchKey> {
        let text = self.debounce.fire(now)?;
        debug!(search = %text, "search settled");
        self.search = text;
        self.sync(now, false)
    }

    /// Jumps to `page`. Pages below 1 are rejected, never clamped.
    pub fn set_page(&mut self, page: u32, now: Instant) -> ApiResult<Option<FetchKey>> {
        if page < 1 {
            return Err(ApiError::invalid_request(format!(
                "Page must be at least 1 (got {page})"
            )));
        }
        self.page = page;
        Ok(self.sync(now, false))
    }

    pub fn next_page(&mut self, now: Instant) -> Option<FetchKey> {
        let has_next = self.window().is_some_and(|w| w.has_next);
        if !has_next {
            return None;
        }
        self.page += 1;
        self.sync(now, false)
    }

    pub fn prev_page(&mut self, now: Instant) -> Option<FetchKey> {
        if self.page <= 1 {
            return None;
        }
        self.page -= 1;
        self.sync(now, false)
    }

    /// Refetches the current key even if cached. Ignored while a search is
    /// still settling; the settled search fetches anyway.
    pub fn refresh(&mut self, now: Instant) -> Option<FetchKey> {
        self.sync(now, true)
    }

    /// Sorting is local: it never changes the fetch key.
    pub fn toggle_sort(&mut self, field: SortField) -> SortSpec {
        self.sort.toggle(field);
        self.sort
    }

    pub fn reset_sort(&mut self) -> SortSpec {
        self.sort.reset();
        self.sort
    }

    pub fn toggle_row(&mut self, id: u64) {
        self.selection.toggle(id);
    }

    pub fn toggle_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.toggle_all(&visible);
    }

    /// Feeds a fetch result back. Results for any key other than the latest
    /// requested one are cached but never shown. Returns true if the result
    /// changed what is displayed.
    pub fn on_fetch_result(
        &mut self,
        key: &FetchKey,
        result: ApiResult<ProductPage>,
        now: Instant,
    ) -> bool {
        let is_latest = self.latest.as_ref() == Some(key);
        match result {
            Ok(page) => {
                let page = self.cache.complete(key, page, now);
                if !is_latest {
                    debug!(page = key.page, search = ?key.search, "discarding superseded page");
                    return false;
                }
                self.show(key.clone(), page);
                self.status = ListStatus::Ready;
            }
            Err(err) => {
                self.cache.fail(key);
                if !is_latest {
                    return false;
                }
                self.status = ListStatus::Error(err.message);
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Search text as typed.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Search text that drives the fetch key.
    pub fn applied_search(&self) -> &str {
        &self.search
    }

    pub fn is_debouncing(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn latest_key(&self) -> Option<&FetchKey> {
        self.latest.as_ref()
    }

    pub fn shown_page(&self) -> Option<&ProductPage> {
        self.shown.as_ref().map(|(_, page)| page.as_ref())
    }

    /// Rows of the displayed page in sort order.
    pub fn rows(&self) -> Vec<&Product> {
        match &self.shown {
            Some((_, page)) => self.sort.apply(&page.products),
            None => Vec::new(),
        }
    }

    pub fn visible_ids(&self) -> Vec<u64> {
        self.rows().iter().map(|p| p.id).collect()
    }

    pub fn header_check(&self) -> HeaderCheck {
        self.selection.header(&self.visible_ids())
    }

    /// Pager for the current page, once a total is known.
    pub fn window(&self) -> Option<PageWindow> {
        self.shown_page()
            .map(|page| PageWindow::new(self.page, self.limit, page.total))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn current_key(&self) -> ApiResult<FetchKey> {
        FetchKey::new(self.page, self.limit, &self.search)
    }

    fn sync(&mut self, now: Instant, force: bool) -> Option<FetchKey> {
        if self.debounce.is_pending() {
            return None;
        }
        let key = match self.current_key() {
            Ok(key) => key,
            Err(err) => {
                self.status = ListStatus::Error(err.message);
                return None;
            }
        };
        if !force && self.latest.as_ref() == Some(&key) {
            return None;
        }
        self.latest = Some(key.clone());

        match self.cache.lookup(&key, now) {
            Lookup::Fresh(page) if !force => {
                self.show(key, page);
                self.status = ListStatus::Ready;
                None
            }
            Lookup::Fresh(page) | Lookup::Stale(page) => {
                self.show(key.clone(), page);
                self.begin_fetch(key)
            }
            Lookup::Missing => self.begin_fetch(key),
        }
    }

    fn begin_fetch(&mut self, key: FetchKey) -> Option<FetchKey> {
        self.status = if self.shown.is_some() {
            ListStatus::Refreshing
        } else {
            ListStatus::Loading
        };
        if self.cache.begin_fetch(&key) {
            Some(key)
        } else {
            debug!(page = key.page, "fetch already in flight");
            None
        }
    }

    fn show(&mut self, key: FetchKey, page: Arc<ProductPage>) {
        let changed = self
            .shown_page()
            .is_none_or(|old| !old.ids().eq(page.ids()));
        if changed {
            self.selection.clear();
        }
        self.shown = Some((key, page));
    }
}
