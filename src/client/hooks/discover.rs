use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};

use super::paged::{PagedFeed, PagedSnapshot};
use crate::client::api::{fetch_as, Endpoint, MediaApi};
use crate::client::request::Ticket;
use crate::client::scroll::{InfiniteFeed, ScrollListener, ScrollPosition};
use crate::client::{DiscoverFilters, MediaSummary, RegionContext, ResultPage};
use crate::media::MediaType;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverSnapshot {
    pub media_type: Option<MediaType>,
    /// Filters as currently edited.
    pub filters: DiscoverFilters,
    /// Filters the shown results were requested with.
    pub applied: DiscoverFilters,
    pub feed: PagedSnapshot,
}

#[derive(Debug, Default)]
struct DiscoverState {
    media_type: Option<MediaType>,
    filters: DiscoverFilters,
    applied: DiscoverFilters,
    feed: PagedFeed,
}

/// Filtered browsing. Edits are local until [`DiscoverPage::apply`]; a
/// media type switch refetches immediately.
pub struct DiscoverPage<A> {
    api: Arc<A>,
    region: RegionContext,
    state: RwLock<DiscoverState>,
}

impl<A: MediaApi> DiscoverPage<A> {
    pub fn new(api: Arc<A>, region: RegionContext) -> Self {
        Self {
            api,
            region,
            state: RwLock::new(DiscoverState::default()),
        }
    }

    /// Genre and provider selections do not carry over to another media
    /// type, neither in the edited nor in the applied filters.
    pub async fn set_media_type(&self, media_type: MediaType) -> bool {
        let (ticket, filters) = {
            let mut state = self.state.write().await;
            state.media_type = Some(media_type);
            state.filters.clear_selection();
            state.applied.clear_selection();
            (state.feed.begin(1), state.applied.clone())
        };
        self.fetch(ticket, media_type, filters, 1).await
    }

    pub async fn edit_filters<F>(&self, edit: F)
    where
        F: FnOnce(&mut DiscoverFilters),
    {
        edit(&mut self.state.write().await.filters);
    }

    /// True when the edited filters differ from the applied ones.
    pub async fn filters_changed(&self) -> bool {
        let state = self.state.read().await;
        state.filters != state.applied
    }

    /// Commits the edited filters and reloads from page 1. Without a media
    /// type there is nothing to load yet.
    pub async fn apply(&self) -> bool {
        let (ticket, media_type, filters) = {
            let mut state = self.state.write().await;
            state.applied = state.filters.clone();
            let Some(media_type) = state.media_type else {
                return false;
            };
            (state.feed.begin(1), media_type, state.applied.clone())
        };
        self.fetch(ticket, media_type, filters, 1).await
    }

    pub async fn load_more(&self) -> bool {
        let (ticket, media_type, filters, page) = {
            let mut state = self.state.write().await;
            let Some(media_type) = state.media_type else {
                return false;
            };
            let Some(page) = state.feed.next_page() else {
                return false;
            };
            (
                state.feed.begin(page),
                media_type,
                state.applied.clone(),
                page,
            )
        };
        self.fetch(ticket, media_type, filters, page).await
    }

    pub async fn snapshot(&self) -> DiscoverSnapshot {
        let state = self.state.read().await;
        DiscoverSnapshot {
            media_type: state.media_type,
            filters: state.filters.clone(),
            applied: state.applied.clone(),
            feed: state.feed.snapshot(),
        }
    }

    async fn fetch(
        &self,
        ticket: Ticket,
        media_type: MediaType,
        filters: DiscoverFilters,
        page: u32,
    ) -> bool {
        let mut params = filters.to_query(media_type, self.region.region());
        params.insert("page".into(), page.to_string());
        let endpoint = Endpoint::Discover { media_type, params };
        tracing::debug!("Discovering {}", endpoint.describe());

        let result =
            fetch_as::<ResultPage<MediaSummary>, _>(&*self.api, &endpoint, ticket.token()).await;
        self.state.write().await.feed.commit(&ticket, page, result)
    }
}

impl<A: MediaApi + 'static> DiscoverPage<A> {
    pub async fn attach_scroll(
        self: &Arc<Self>,
        positions: watch::Receiver<ScrollPosition>,
    ) -> Option<ScrollListener> {
        self.state.read().await.media_type?;
        Some(ScrollListener::attach(self.clone(), positions))
    }
}

#[async_trait]
impl<A: MediaApi + 'static> InfiniteFeed for DiscoverPage<A> {
    async fn on_scroll(&self, position: ScrollPosition) -> bool {
        if !position.near_bottom() {
            return false;
        }
        self.load_more().await
    }
}
