use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use validator::Validate;

use super::{require_params, respond_cached, validate_not_blank, ApiError, RegionQuery};
use crate::cache::{CacheKey, ResponseCache};
use crate::region::DefaultRegion;
use crate::upstream::{query_params, TmdbClient};

const MOVIE_APPEND: &str =
    "images,release_dates,credits,videos,similar,recommendations,watch/providers,reviews";
const TV_APPEND: &str =
    "images,content_ratings,credits,videos,similar,recommendations,watch/providers,reviews";
pub const PERSON_APPEND: &str = "images,combined_credits,external_ids";
const SEASON_APPEND: &str = "images,aggregate_credits,videos,watch/providers";

/// Sub-resources fetched alongside a title in one provider call. Unknown
/// media types get the tv set and are left for the provider to reject.
pub fn append_set(media_type: &str) -> &'static str {
    match media_type {
        "movie" => MOVIE_APPEND,
        "person" => PERSON_APPEND,
        _ => TV_APPEND,
    }
}

#[derive(Deserialize, Validate, Debug)]
pub struct DetailsPath {
    #[validate(custom(function = "validate_not_blank"))]
    pub media_type: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub id: String,
}

#[derive(Deserialize, Validate, Debug)]
pub struct SeasonPath {
    #[validate(custom(function = "validate_not_blank"))]
    pub id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub season_number: String,
}

pub async fn get_details(
    path: Path<DetailsPath>,
    query: Query<RegionQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Media type and ID are required")?;
    let region = default_region.resolve(query.region.as_deref());

    let key = CacheKey::new("details")
        .segment(&path.media_type)
        .segment(&path.id)
        .param("region", &region)
        .build();
    let params = query_params([
        ("append_to_response", append_set(&path.media_type).to_string()),
        ("include_adult", "false".to_string()),
    ]);

    respond_cached(
        &cache,
        key,
        "Error fetching media details",
        client.call(&[&path.media_type, &path.id], &params, &region),
    )
    .await
}

pub async fn get_season_details(
    path: Path<SeasonPath>,
    query: Query<RegionQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Show ID and season number are required")?;
    let region = default_region.resolve(query.region.as_deref());

    let key = CacheKey::new("season")
        .segment(&path.id)
        .segment(&path.season_number)
        .param("region", &region)
        .build();
    let params = query_params([("append_to_response", SEASON_APPEND.to_string())]);

    respond_cached(
        &cache,
        key,
        "Error fetching season details",
        client.call(
            &["tv", &path.id, "season", &path.season_number],
            &params,
            &region,
        ),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_set_depends_on_media_type() {
        assert!(append_set("movie").contains("release_dates"));
        assert!(!append_set("movie").contains("content_ratings"));
        assert!(append_set("tv").contains("content_ratings"));
        assert!(append_set("person").contains("combined_credits"));
        assert!(!append_set("person").contains(",credits"));
        assert_eq!(append_set("badtype"), append_set("tv"));
    }
}
