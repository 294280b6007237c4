use actix_web::{
    web::{Data, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use validator::Validate;

use super::{
    require_params, respond_cached, validate_not_blank, ApiError, RegionQuery, PERSON_APPEND,
};
use crate::cache::{CacheKey, ResponseCache};
use crate::region::DefaultRegion;
use crate::upstream::{query_params, TmdbClient};

#[derive(Deserialize, Validate, Debug)]
pub struct PersonPath {
    #[validate(custom(function = "validate_not_blank"))]
    pub id: String,
}

pub async fn get_person(
    path: Path<PersonPath>,
    query: Query<RegionQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    require_params(&*path, "ID is required")?;
    let region = default_region.resolve(query.region.as_deref());

    let key = CacheKey::new("person")
        .segment(&path.id)
        .param("region", &region)
        .build();
    let params = query_params([("append_to_response", PERSON_APPEND.to_string())]);

    respond_cached(
        &cache,
        key,
        "Error fetching person data",
        client.call(&["person", &path.id], &params, &region),
    )
    .await
}
