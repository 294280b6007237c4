use std::sync::Arc;

use crate::client::api::{fetch_as, Endpoint, MediaApi};
use crate::client::request::{LoadState, Resource};
use crate::client::{MediaDetail, SeasonDetail};
use crate::media::MediaType;

/// Detail view of a title, with an optional season panel for shows.
/// Opening another title or season cancels the previous load.
pub struct InfoPage<A> {
    api: Arc<A>,
    details: Resource<MediaDetail>,
    season: Resource<SeasonDetail>,
}

impl<A: MediaApi> InfoPage<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            details: Resource::new(),
            season: Resource::new(),
        }
    }

    pub async fn open(&self, media_type: MediaType, id: u64) -> bool {
        self.season.reset().await;
        let endpoint = Endpoint::Details { media_type, id };
        self.details
            .load(|cancel| async move { fetch_as(&*self.api, &endpoint, &cancel).await })
            .await
    }

    pub async fn open_season(&self, show_id: u64, season_number: u32) -> bool {
        let endpoint = Endpoint::Season {
            show_id,
            season_number,
        };
        self.season
            .load(|cancel| async move { fetch_as(&*self.api, &endpoint, &cancel).await })
            .await
    }

    pub async fn close_season(&self) {
        self.season.reset().await;
    }

    pub async fn details(&self) -> LoadState<MediaDetail> {
        self.details.state().await
    }

    pub async fn season(&self) -> LoadState<SeasonDetail> {
        self.season.state().await
    }
}

/// Person view backed by `/api/person/{id}`.
pub struct PersonPage<A> {
    api: Arc<A>,
    person: Resource<MediaDetail>,
}

impl<A: MediaApi> PersonPage<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            person: Resource::new(),
        }
    }

    pub async fn open(&self, id: u64) -> bool {
        let endpoint = Endpoint::Person { id };
        self.person
            .load(|cancel| async move { fetch_as(&*self.api, &endpoint, &cancel).await })
            .await
    }

    pub async fn person(&self) -> LoadState<MediaDetail> {
        self.person.state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeApi;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn navigating_away_discards_previous_title() {
        let api = Arc::new(FakeApi::new());
        api.respond("details/movie/1", 300, json!({"id": 1, "title": "Slow"}));
        api.respond("details/tv/2", 20, json!({"id": 2, "name": "Fast"}));
        let page = Arc::new(InfoPage::new(api));

        let first = {
            let page = page.clone();
            tokio::spawn(async move { page.open(MediaType::Movie, 1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(page.open(MediaType::Tv, 2).await);
        assert!(!first.await.unwrap());

        let details = page.details().await;
        assert_eq!(details.data().and_then(MediaDetail::title), Some("Fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn season_panel_resets_with_the_title() {
        let api = Arc::new(FakeApi::new());
        api.respond("details/tv/2", 5, json!({"id": 2}));
        api.respond("details/tv/2/season/1", 5, json!({"season_number": 1, "episodes": [{}, {}]}));
        let page = InfoPage::new(api);

        page.open(MediaType::Tv, 2).await;
        assert!(page.open_season(2, 1).await);
        assert_eq!(
            page.season().await.data().map(|season| season.episodes().len()),
            Some(2)
        );

        page.open(MediaType::Tv, 2).await;
        assert_eq!(page.season().await, LoadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_person_reports_provider_message() {
        let api = Arc::new(FakeApi::new());
        api.fail(
            "person/0",
            5,
            404,
            "The resource you requested could not be found.",
        );
        let page = PersonPage::new(api);

        assert!(page.open(0).await);
        assert_eq!(
            page.person().await.error(),
            Some("The resource you requested could not be found.")
        );
    }
}
