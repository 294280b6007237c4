use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};

use super::{require_params, respond_cached, ApiError, MediaTypePath};
use crate::cache::{CacheKey, QueryParams, ResponseCache};
use crate::region::DefaultRegion;
use crate::upstream::TmdbClient;

/// Parameters that shape the route itself and are never forwarded as filters.
const RESERVED_PARAMS: [&str; 3] = ["region", "mediaType", "media_type"];

pub fn forwarded_filters(query: &QueryParams) -> QueryParams {
    query
        .iter()
        .filter(|(name, _)| !RESERVED_PARAMS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Filtered listing. Sort order, pipe-delimited genre and provider lists,
/// date ranges, `vote_count.gte` and `page` are passed to the provider as-is.
pub async fn get_discover(
    path: Path<MediaTypePath>,
    query: Query<QueryParams>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Media type is required")?;
    let region = default_region.resolve(query.get("region").map(String::as_str));
    let filters = forwarded_filters(&query);

    let key = CacheKey::new("discover")
        .segment(&path.media_type)
        .params(&filters)
        .param("region", &region)
        .build();

    respond_cached(
        &cache,
        key,
        "Error discovering media",
        client.call(&["discover", &path.media_type], &filters, &region),
    )
    .await
}
