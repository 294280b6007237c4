use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{respond_cached, ApiError};
use crate::cache::{CacheKey, QueryParams, ResponseCache};
use crate::media::TrailerFilter;
use crate::region::{DefaultRegion, Region};
use crate::upstream::{query_params, TmdbClient, UpstreamError};

pub const TRAILER_SAMPLE_SIZE: usize = 10;
/// Netflix, Prime Video, Disney+, Max, Apple TV+, Paramount+.
pub const STREAMING_PROVIDERS: &str = "8|9|337|384|350|531";

#[derive(Deserialize, Debug)]
pub struct TrailersQuery {
    pub filter: Option<String>,
    pub region: Option<String>,
}

/// Provider listing backing each trailer filter.
pub fn trailer_source(
    filter: TrailerFilter,
    region: &Region,
) -> ([&'static str; 2], QueryParams) {
    match filter {
        TrailerFilter::Popular => (
            ["movie", "popular"],
            query_params([("page", "1".to_string())]),
        ),
        TrailerFilter::Theatres => (
            ["movie", "now_playing"],
            query_params([("page", "1".to_string())]),
        ),
        TrailerFilter::Streaming => (
            ["discover", "movie"],
            query_params([
                ("sort_by", "popularity.desc".to_string()),
                ("with_watch_providers", STREAMING_PROVIDERS.to_string()),
                ("watch_region", region.to_string()),
                ("page", "1".to_string()),
            ]),
        ),
    }
}

/// First YouTube trailer in a `videos` response.
pub fn pick_trailer(videos: &Value) -> Option<&Value> {
    videos["results"].as_array()?.iter().find(|video| {
        video["type"]
            .as_str()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("trailer"))
            && video["site"] == "YouTube"
    })
}

async fn trailer_for(client: &TmdbClient, movie: &Value, region: &Region) -> Option<Value> {
    let id = movie["id"].as_u64()?;
    let id_segment = id.to_string();
    let videos = match client
        .call(&["movie", &id_segment, "videos"], &QueryParams::new(), region)
        .await
    {
        Ok(videos) => videos,
        Err(err) => {
            tracing::warn!("Skipping trailer for movie {}: {}", id, err);
            return None;
        }
    };

    let mut trailer = pick_trailer(&videos)?.clone();
    if let Some(fields) = trailer.as_object_mut() {
        fields.insert("movieTitle".to_string(), movie["title"].clone());
    }
    Some(trailer)
}

async fn collect_trailers(
    client: &TmdbClient,
    filter: TrailerFilter,
    region: &Region,
) -> Result<Value, UpstreamError> {
    let (path, params) = trailer_source(filter, region);
    let listing = client.call(&path, &params, region).await?;
    let movies: Vec<Value> = listing["results"]
        .as_array()
        .map(|results| results.iter().take(TRAILER_SAMPLE_SIZE).cloned().collect())
        .unwrap_or_default();

    let trailers: Vec<Value> = join_all(
        movies
            .iter()
            .map(|movie| trailer_for(client, movie, region)),
    )
    .await
    .into_iter()
    .flatten()
    .collect();
    tracing::info!(
        filter = filter.as_str(),
        "Found {} trailers in {} movies",
        trailers.len(),
        movies.len()
    );
    Ok(json!(trailers))
}

pub async fn get_latest_trailers(
    query: Query<TrailersQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    let region = default_region.resolve(query.region.as_deref());
    let filter = TrailerFilter::parse(query.filter.as_deref());
    let key = CacheKey::new("latest_trailers")
        .segment(filter.as_str())
        .param("region", &region)
        .build();

    respond_cached(
        &cache,
        key,
        "Error fetching latest trailers",
        collect_trailers(&client, filter, &region),
    )
    .await
}
