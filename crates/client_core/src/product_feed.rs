//! Paginated product grid state.
//!
//! Couples [`EndlessScroll`] with a [`PaginationService`]: the scroll edge
//! starts a page request, and an explicit in-flight latch keeps a second
//! request from starting until the first one resolves.

use shared::{
    domain::ProductSummary,
    error::FetchErrorKind,
    protocol::{PageCursor, ProductPage},
};
use tracing::{debug, info, warn};

use crate::{endless_scroll::EndlessScroll, PaginationService};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PLACEHOLDER_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOptions {
    pub page_size: usize,
    pub scroll_buffer: usize,
    pub placeholder_count: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_buffer: crate::endless_scroll::DEFAULT_BUFFER,
            placeholder_count: DEFAULT_PLACEHOLDER_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Exhausted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridItem {
    Product(ProductSummary),
    Placeholder,
}

/// Single-use handle for one page fetch, consumed by [`ProductFeed::complete_load`].
#[derive(Debug)]
#[must_use = "a page request must be completed with the fetch outcome"]
pub struct PageRequest {
    cursor: PageCursor,
    limit: usize,
    generation: u64,
}

impl PageRequest {
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[derive(Debug, Clone)]
pub struct ProductFeed {
    options: FeedOptions,
    items: Vec<ProductSummary>,
    next_cursor: PageCursor,
    state: LoadState,
    in_flight: bool,
    // Bumped by `refresh` so responses for a discarded feed are dropped.
    generation: u64,
    scroll: EndlessScroll,
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new(FeedOptions::default())
    }
}

impl ProductFeed {
    pub fn new(options: FeedOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            next_cursor: PageCursor::start(),
            state: LoadState::Idle,
            in_flight: false,
            generation: 0,
            scroll: EndlessScroll::new(options.scroll_buffer),
        }
    }

    pub fn items(&self) -> &[ProductSummary] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn next_cursor(&self) -> PageCursor {
        self.next_cursor
    }

    /// Products followed by placeholders while a page is in flight.
    pub fn grid_items(&self) -> Vec<GridItem> {
        let placeholders = if self.in_flight {
            self.options.placeholder_count
        } else {
            0
        };
        self.items
            .iter()
            .cloned()
            .map(GridItem::Product)
            .chain(std::iter::repeat(GridItem::Placeholder).take(placeholders))
            .collect()
    }

    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.in_flight {
            debug!(cursor = self.next_cursor.0, "page load ignored: request in flight");
            return None;
        }
        if self.state == LoadState::Exhausted {
            debug!("page load ignored: catalog exhausted");
            return None;
        }

        self.in_flight = true;
        self.state = LoadState::Loading;
        debug!(cursor = self.next_cursor.0, limit = self.options.page_size, "page load started");
        Some(PageRequest {
            cursor: self.next_cursor,
            limit: self.options.page_size,
            generation: self.generation,
        })
    }

    pub fn complete_load(
        &mut self,
        request: PageRequest,
        result: Result<ProductPage, FetchErrorKind>,
    ) {
        if request.generation != self.generation {
            debug!(cursor = request.cursor.0, "stale page response dropped");
            return;
        }
        self.in_flight = false;
        match result {
            Ok(page) => {
                info!(
                    cursor = request.cursor.0,
                    received = page.items.len(),
                    total = self.items.len() + page.items.len(),
                    "page loaded"
                );
                self.items.extend(page.items);
                // The grid grew under a possibly resting viewport; re-arm the edge.
                self.scroll.reset();
                match page.next_cursor {
                    Some(next) => {
                        self.next_cursor = next;
                        self.state = LoadState::Loaded;
                    }
                    None => self.state = LoadState::Exhausted,
                }
            }
            Err(err) => {
                warn!(cursor = request.cursor.0, error = %err, "page load failed");
                self.state = LoadState::Failed(err.to_string());
            }
        }
    }

    /// Feeds a new scroll position; returns a request when the bottom edge fires.
    pub fn on_scroll(&mut self, last_visible_index: Option<usize>) -> Option<PageRequest> {
        let total = self.grid_items_len();
        if !self
            .scroll
            .on_scroll_position_changed(last_visible_index, total)
        {
            return None;
        }

        let request = self.begin_load();
        if request.is_none() {
            self.scroll.reset();
        }
        request
    }

    pub async fn load_next<S>(&mut self, service: &S) -> bool
    where
        S: PaginationService + ?Sized,
    {
        match self.begin_load() {
            Some(request) => {
                self.run(service, request).await;
                true
            }
            None => false,
        }
    }

    pub async fn scroll_to<S>(&mut self, service: &S, last_visible_index: Option<usize>) -> bool
    where
        S: PaginationService + ?Sized,
    {
        match self.on_scroll(last_visible_index) {
            Some(request) => {
                self.run(service, request).await;
                true
            }
            None => false,
        }
    }

    /// Re-issues the failed page; no-op unless the last load failed.
    pub async fn retry<S>(&mut self, service: &S) -> bool
    where
        S: PaginationService + ?Sized,
    {
        if !matches!(self.state, LoadState::Failed(_)) {
            return false;
        }
        self.load_next(service).await
    }

    pub fn refresh(&mut self) {
        self.items.clear();
        self.next_cursor = PageCursor::start();
        self.state = LoadState::Idle;
        self.in_flight = false;
        self.generation += 1;
        self.scroll.reset();
    }

    async fn run<S>(&mut self, service: &S, request: PageRequest)
    where
        S: PaginationService + ?Sized,
    {
        let result = service.fetch_page(request.cursor, request.limit).await;
        self.complete_load(request, result);
    }

    fn grid_items_len(&self) -> usize {
        self.items.len()
            + if self.in_flight {
                self.options.placeholder_count
            } else {
                0
            }
    }
}

#[cfg(test)]
#[path = "tests/product_feed_tests.rs"]
mod tests;
