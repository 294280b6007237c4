use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use validator::Validate;

use super::{require_params, respond_cached, validate_not_blank, ApiError, PageQuery};
use crate::cache::{CacheKey, ResponseCache};
use crate::region::DefaultRegion;
use crate::upstream::{query_params, TmdbClient};

#[derive(Deserialize, Validate, Debug)]
pub struct SearchPath {
    /// `multi`, `movie`, `tv` or `person`; forwarded unchecked.
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub query: String,
}

pub async fn get_search(
    path: Path<SearchPath>,
    query: Query<PageQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "Media type and query are required")?;
    let region = default_region.resolve(query.region.as_deref());
    let page = query.page();
    let search_term = path.query.trim();
    tracing::info!(category = %path.category, page, "Searching for `{}`", search_term);

    let key = CacheKey::new("search")
        .segment(&path.category)
        .segment(search_term)
        .param("page", page)
        .param("region", &region)
        .build();
    let params = query_params([
        ("query", search_term.to_string()),
        ("page", page.to_string()),
    ]);

    respond_cached(
        &cache,
        key,
        "Error searching",
        client.call(&["search", &path.category], &params, &region),
    )
    .await
}
