use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use serde::Deserialize;

use super::{page_number, require_params, respond_cached, ApiError, MediaTypePath, PageQuery};
use crate::cache::{CacheKey, ResponseCache};
use crate::region::DefaultRegion;
use crate::upstream::{query_params, TmdbClient};

#[derive(Deserialize, Debug)]
pub struct TrendingQuery {
    pub time_window: Option<String>,
    pub page: Option<u32>,
    pub region: Option<String>,
}

fn time_window(raw: Option<&str>) -> Result<&'static str, ApiError> {
    match raw.map(str::trim) {
        None | Some("") | Some("week") => Ok("week"),
        Some("day") => Ok("day"),
        Some(other) => {
            tracing::error!("Unsupported time window `{}`", other);
            Err(ApiError::BadRequest(
                "time_window must be `day` or `week`".to_string(),
            ))
        }
    }
}

pub async fn get_trending(
    path: Path<MediaTypePath>,
    query: Query<TrendingQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Media type is required")?;
    let window = time_window(query.time_window.as_deref())?;
    let region = default_region.resolve(query.region.as_deref());
    let page = page_number(query.page);

    let key = CacheKey::new("trending")
        .segment(&path.media_type)
        .segment(window)
        .param("page", page)
        .param("region", &region)
        .build();
    let params = query_params([("page", page.to_string())]);

    respond_cached(
        &cache,
        key,
        "Error fetching trending data",
        client.call(&["trending", &path.media_type, window], &params, &region),
    )
    .await
}

/// Fixed per-media-type lists the provider exposes as `{media_type}/{list}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Popular,
    TopRated,
    NowPlaying,
}

impl Listing {
    fn upstream_name(&self) -> &'static str {
        match self {
            Listing::Popular => "popular",
            Listing::TopRated => "top_rated",
            Listing::NowPlaying => "now_playing",
        }
    }

    fn fallback_message(&self) -> &'static str {
        match self {
            Listing::Popular => "Error fetching popular data",
            Listing::TopRated => "Error fetching top rated data",
            Listing::NowPlaying => "Error fetching now playing data",
        }
    }
}

async fn get_listing(
    listing: Listing,
    path: Path<MediaTypePath>,
    query: Query<PageQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Media type is required")?;
    let region = default_region.resolve(query.region.as_deref());
    let page = query.page();

    let key = CacheKey::new(listing.upstream_name())
        .segment(&path.media_type)
        .param("page", page)
        .param("region", &region)
        .build();
    let params = query_params([("page", page.to_string())]);

    respond_cached(
        &cache,
        key,
        listing.fallback_message(),
        client.call(
            &[&path.media_type, listing.upstream_name()],
            &params,
            &region,
        ),
    )
    .await
}

pub async fn get_popular(
    path: Path<MediaTypePath>,
    query: Query<PageQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    get_listing(Listing::Popular, path, query, client, cache, default_region).await
}

pub async fn get_top_rated(
    path: Path<MediaTypePath>,
    query: Query<PageQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    get_listing(Listing::TopRated, path, query, client, cache, default_region).await
}

pub async fn get_now_playing(
    path: Path<MediaTypePath>,
    query: Query<PageQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    get_listing(Listing::NowPlaying, path, query, client, cache, default_region).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_window_defaults_to_week() {
        assert_eq!(time_window(None).unwrap(), "week");
        assert_eq!(time_window(Some("")).unwrap(), "week");
        assert_eq!(time_window(Some("day")).unwrap(), "day");
        assert!(time_window(Some("month")).is_err());
    }
}
