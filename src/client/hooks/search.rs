use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use super::paged::{PagedFeed, PagedSnapshot};
use crate::client::api::{fetch_as, Endpoint, MediaApi};
use crate::client::request::Ticket;
use crate::client::scroll::{InfiniteFeed, ScrollListener, ScrollPosition};
use crate::client::{MediaSummary, ResultPage};
use crate::media::SearchCategory;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub category: SearchCategory,
    pub feed: PagedSnapshot,
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    category: SearchCategory,
    feed: PagedFeed,
}

/// Search results with infinite scrolling. Typing a new query while one is
/// loading cancels it; only the latest query's results are ever shown.
pub struct SearchPage<A> {
    api: Arc<A>,
    state: RwLock<SearchState>,
}

impl<A: MediaApi> SearchPage<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(SearchState::default()),
        }
    }

    /// Starts over at page 1. A blank query clears the view without a
    /// request.
    pub async fn search(&self, query: &str, category: SearchCategory) -> bool {
        let query = query.trim().to_string();
        let ticket = {
            let mut state = self.state.write().await;
            state.query = query.clone();
            state.category = category;
            if query.is_empty() {
                state.feed.reset();
                return false;
            }
            state.feed.begin(1)
        };
        self.fetch(ticket, query, category, 1).await
    }

    pub async fn load_more(&self) -> bool {
        let (ticket, query, category, page) = {
            let mut state = self.state.write().await;
            if state.query.is_empty() {
                return false;
            }
            let Some(page) = state.feed.next_page() else {
                return false;
            };
            (
                state.feed.begin(page),
                state.query.clone(),
                state.category,
                page,
            )
        };
        self.fetch(ticket, query, category, page).await
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.read().await;
        SearchSnapshot {
            query: state.query.clone(),
            category: state.category,
            feed: state.feed.snapshot(),
        }
    }

    async fn fetch(
        &self,
        ticket: Ticket,
        query: String,
        category: SearchCategory,
        page: u32,
    ) -> bool {
        tracing::debug!(category = category.as_str(), page, "Searching for `{}`", query);
        let endpoint = Endpoint::Search {
            category,
            query,
            page,
        };
        let result =
            fetch_as::<ResultPage<MediaSummary>, _>(&*self.api, &endpoint, ticket.token()).await;
        self.state.write().await.feed.commit(&ticket, page, result)
    }
}

impl<A: MediaApi + 'static> SearchPage<A> {
    /// Listens for scroll positions while a query is active. Dropping the
    /// listener detaches it.
    pub async fn attach_scroll(
        self: &Arc<Self>,
        positions: watch::Receiver<ScrollPosition>,
    ) -> Option<ScrollListener> {
        if self.state.read().await.query.is_empty() {
            return None;
        }
        Some(ScrollListener::attach(self.clone(), positions))
    }
}

#[async_trait]
impl<A: MediaApi + 'static> InfiniteFeed for SearchPage<A> {
    async fn on_scroll(&self, position: ScrollPosition) -> bool {
        if !position.near_bottom() {
            return false;
        }
        self.load_more().await
    }
}
