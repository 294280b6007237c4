use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::client::api::{fetch_as, Endpoint, ListKind, MediaApi};
use crate::client::request::{LoadState, Resource};
use crate::client::{ClientError, MediaDetail, MediaSummary, ResultPage, Trailer};
use crate::media::{MediaType, TimeWindow, TrailerFilter};

/// Which list a home page row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// Trending across every media type. People are left out of the row.
    Trending(TimeWindow),
    Listing(ListKind, MediaType),
}

impl ListSource {
    pub fn endpoint(&self) -> Endpoint {
        match *self {
            ListSource::Trending(window) => Endpoint::Trending {
                media: None,
                window,
                page: 1,
            },
            ListSource::Listing(list, media_type) => Endpoint::Listing {
                list,
                media_type,
                page: 1,
            },
        }
    }

    fn keeps(&self, item: &MediaSummary) -> bool {
        !matches!(self, ListSource::Trending(_)) || !item.is_person()
    }
}

pub async fn fetch_list<A: MediaApi + ?Sized>(
    api: &A,
    source: ListSource,
    cancel: &CancellationToken,
) -> Result<Vec<MediaSummary>, ClientError> {
    let page: ResultPage<MediaSummary> = fetch_as(api, &source.endpoint(), cancel).await?;
    Ok(page
        .results
        .into_iter()
        .filter(|item| source.keeps(item))
        .collect())
}

/// One horizontally scrolling row of titles.
pub struct ListSection<A> {
    api: Arc<A>,
    source: RwLock<ListSource>,
    items: Resource<Vec<MediaSummary>>,
}

impl<A: MediaApi> ListSection<A> {
    pub fn new(api: Arc<A>, source: ListSource) -> Self {
        Self {
            api,
            source: RwLock::new(source),
            items: Resource::new(),
        }
    }

    pub async fn load(&self) -> bool {
        let source = *self.source.read().await;
        self.items
            .load(|cancel| async move { fetch_list(&*self.api, source, &cancel).await })
            .await
    }

    /// Switching the source reloads, superseding a load in flight.
    pub async fn set_source(&self, source: ListSource) -> bool {
        *self.source.write().await = source;
        self.load().await
    }

    pub async fn source(&self) -> ListSource {
        *self.source.read().await
    }

    pub async fn state(&self) -> LoadState<Vec<MediaSummary>> {
        self.items.state().await
    }
}

pub struct TrailerSection<A> {
    api: Arc<A>,
    filter: RwLock<TrailerFilter>,
    trailers: Resource<Vec<Trailer>>,
}

impl<A: MediaApi> TrailerSection<A> {
    pub fn new(api: Arc<A>, filter: TrailerFilter) -> Self {
        Self {
            api,
            filter: RwLock::new(filter),
            trailers: Resource::new(),
        }
    }

    pub async fn load(&self) -> bool {
        let endpoint = Endpoint::LatestTrailers {
            filter: *self.filter.read().await,
        };
        self.trailers
            .load(|cancel| async move { fetch_as(&*self.api, &endpoint, &cancel).await })
            .await
    }

    pub async fn set_filter(&self, filter: TrailerFilter) -> bool {
        *self.filter.write().await = filter;
        self.load().await
    }

    pub async fn state(&self) -> LoadState<Vec<Trailer>> {
        self.trailers.state().await
    }
}

pub struct CarouselSection<A> {
    api: Arc<A>,
    items: Resource<Vec<MediaDetail>>,
}

impl<A: MediaApi> CarouselSection<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            items: Resource::new(),
        }
    }

    pub async fn load(&self) -> bool {
        self.items
            .load(|cancel| async move {
                fetch_as(&*self.api, &Endpoint::HomepageCarousel, &cancel).await
            })
            .await
    }

    pub async fn state(&self) -> LoadState<Vec<MediaDetail>> {
        self.items.state().await
    }
}
