mod test_startup;
use filmhub::client::hooks::{HomePage, InfoPage, SearchPage};
use filmhub::client::{ClientError, Endpoint, MediaApi, MediaDetail, ProxyApi, RegionContext};
use filmhub::media::{MediaType, SearchCategory};
use filmhub::region::Region;
use std::sync::Arc;
use test_startup::*;
use tokio_util::sync::CancellationToken;

fn proxy(app: &TestApp, region: &str) -> ProxyApi {
    ProxyApi::new(
        &app.address,
        RegionContext::new(Region::parse(region).unwrap()),
    )
    .expect("Failed to build proxy client")
}

#[actix_rt::test]
async fn proxy_api_unwraps_the_data_envelope() {
    let app = spawn_app().await;
    let api = proxy(&app, "GB");

    let movie = api
        .fetch(
            &Endpoint::Details {
                media_type: MediaType::Movie,
                id: 603,
            },
            &CancellationToken::new(),
        )
        .await
        .expect("Failed to fetch details");

    let movie = MediaDetail(movie);
    assert_eq!(movie.id(), Some(603));
    assert_eq!(movie.title(), Some("The Matrix"));
    assert_eq!(app.calls_to("/movie/603")[0].query["region"], "GB");
}

#[actix_rt::test]
async fn proxy_api_surfaces_the_error_message() {
    let app = spawn_app().await;
    let api = proxy(&app, "US");

    let err = api
        .fetch(&Endpoint::Person { id: 0 }, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
}

#[actix_rt::test]
async fn cancelled_fetch_never_reaches_the_proxy() {
    let app = spawn_app().await;
    let api = proxy(&app, "US");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = api
        .fetch(&Endpoint::HomepageCarousel, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Cancelled));
    assert!(app.upstream_calls.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn search_page_pages_through_the_proxy() {
    let app = spawn_app().await;
    let page = SearchPage::new(Arc::new(proxy(&app, "US")));

    assert!(page.search("matrix", SearchCategory::Multi).await);
    assert!(page.load_more().await);

    let snapshot = page.snapshot().await;
    let ids: Vec<u64> = snapshot.feed.results.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![11, 21]);
    assert_eq!(snapshot.feed.page, 2);
    assert_eq!(snapshot.feed.total_pages, 3);
    assert!(snapshot.feed.has_more());
}

#[actix_rt::test]
async fn home_page_loads_every_row() {
    let app = spawn_app().await;
    let home = HomePage::new(Arc::new(proxy(&app, "US")));

    home.load().await;

    assert_eq!(home.carousel.state().await.data().map(Vec::len), Some(10));
    assert_eq!(home.popular_movies.state().await.data().map(Vec::len), Some(3));
    assert_eq!(home.latest_trailers.state().await.data().map(Vec::len), Some(2));
    assert_eq!(home.trending.state().await.data().map(Vec::len), Some(6));
    assert_eq!(app.calls_to("/trending/all/day").len(), 1);
}

#[actix_rt::test]
async fn info_page_reads_certification_sources() {
    let app = spawn_app().await;
    let info = InfoPage::new(Arc::new(proxy(&app, "US")));

    assert!(info.open(MediaType::Tv, 1399).await);
    let details = info.details().await;
    let show = details.data().expect("details loaded");
    assert!(show.sub_resource("content_ratings").is_some());
    assert!(show.sub_resource("release_dates").is_none());
}
