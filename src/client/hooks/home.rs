use std::sync::Arc;

use super::sections::{CarouselSection, ListSection, ListSource, TrailerSection};
use crate::client::api::{ListKind, MediaApi};
use crate::media::{MediaType, TimeWindow, TrailerFilter};

/// The landing page. Every row loads on its own, so a failing row shows its
/// error while the others render.
pub struct HomePage<A> {
    pub carousel: CarouselSection<A>,
    pub trending: ListSection<A>,
    pub popular_movies: ListSection<A>,
    pub top_rated_tv: ListSection<A>,
    pub popular_people: ListSection<A>,
    pub latest_trailers: TrailerSection<A>,
}

impl<A: MediaApi> HomePage<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            carousel: CarouselSection::new(api.clone()),
            trending: ListSection::new(api.clone(), ListSource::Trending(TimeWindow::Day)),
            popular_movies: ListSection::new(
                api.clone(),
                ListSource::Listing(ListKind::Popular, MediaType::Movie),
            ),
            top_rated_tv: ListSection::new(
                api.clone(),
                ListSource::Listing(ListKind::TopRated, MediaType::Tv),
            ),
            popular_people: ListSection::new(
                api.clone(),
                ListSource::Listing(ListKind::Popular, MediaType::Person),
            ),
            latest_trailers: TrailerSection::new(api, TrailerFilter::Popular),
        }
    }

    pub async fn load(&self) {
        tokio::join!(
            self.carousel.load(),
            self.trending.load(),
            self.popular_movies.load(),
            self.top_rated_tv.load(),
            self.popular_people.load(),
            self.latest_trailers.load(),
        );
    }

    pub async fn set_time_window(&self, window: TimeWindow) -> bool {
        self.trending.set_source(ListSource::Trending(window)).await
    }

    pub async fn set_trailer_filter(&self, filter: TrailerFilter) -> bool {
        self.latest_trailers.set_filter(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{page_of, FakeApi};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn failing_row_does_not_block_others() {
        let api = Arc::new(FakeApi::new());
        api.respond("homepage/carousel", 5, json!([{"id": 1, "media_type": "movie"}]));
        api.respond("trending/all?time_window=day&page=1", 5, page_of(1, &[1, 2], 1));
        api.fail("popular/movie?page=1", 5, 500, "Error fetching popular data");
        api.respond("top-rated/tv?page=1", 5, page_of(1, &[3], 1));
        api.respond("popular/person?page=1", 5, page_of(1, &[4], 1));
        api.respond("latest-trailers?filter=popular", 5, json!([]));
        let home = HomePage::new(api.clone());

        home.load().await;

        assert_eq!(
            home.popular_movies.state().await.error(),
            Some("Error fetching popular data")
        );
        assert_eq!(home.trending.state().await.data().map(Vec::len), Some(2));
        assert_eq!(home.top_rated_tv.state().await.data().map(Vec::len), Some(1));
        assert_eq!(home.popular_people.state().await.data().map(Vec::len), Some(1));
        assert_eq!(home.carousel.state().await.data().map(Vec::len), Some(1));
        assert_eq!(home.latest_trailers.state().await.data().map(Vec::len), Some(0));
        assert_eq!(api.calls().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn time_window_reloads_trending_only() {
        let api = Arc::new(FakeApi::new());
        api.respond("trending/all?time_window=week&page=1", 5, page_of(1, &[9], 1));
        let home = HomePage::new(api.clone());

        assert!(home.set_time_window(TimeWindow::Week).await);
        assert_eq!(api.calls(), vec!["trending/all?time_window=week&page=1"]);
        assert_eq!(
            home.trending.source().await,
            ListSource::Trending(TimeWindow::Week)
        );
    }
}
