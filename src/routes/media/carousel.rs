use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use futures_util::future::join_all;
use rand::seq::SliceRandom;
use serde_json::{json, Value};

use super::{respond_cached, ApiError, RegionQuery};
use crate::cache::{CacheKey, ResponseCache};
use crate::region::{DefaultRegion, Region};
use crate::upstream::{query_params, TmdbClient, UpstreamError};

pub const CAROUSEL_SIZE: usize = 10;
const CAROUSEL_APPEND: &str = "images,release_dates,content_ratings,watch/providers";

/// Tags each trending result with its media type and keeps only items that
/// have a backdrop to show.
pub fn carousel_candidates(list: Value, media_type: &str) -> Vec<Value> {
    let results = match list {
        Value::Object(mut body) => body.remove("results"),
        _ => None,
    };
    let Some(Value::Array(items)) = results else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter(|item| item["backdrop_path"].as_str().is_some_and(|path| !path.is_empty()))
        .map(|mut item| {
            if let Some(fields) = item.as_object_mut() {
                fields.insert("media_type".to_string(), json!(media_type));
            }
            item
        })
        .collect()
}

/// Full detail for one sampled title, or the summary itself when the detail
/// call fails.
async fn enrich(client: &TmdbClient, summary: Value, region: &Region) -> Value {
    let media_type = summary["media_type"].as_str().unwrap_or("movie").to_string();
    let Some(id) = summary["id"].as_u64() else {
        tracing::warn!("Carousel item without a numeric id, keeping summary");
        return summary;
    };

    let params = query_params([("append_to_response", CAROUSEL_APPEND.to_string())]);
    let id_segment = id.to_string();
    match client
        .call(&[&media_type, &id_segment], &params, region)
        .await
    {
        Ok(mut detail) => {
            if let Some(fields) = detail.as_object_mut() {
                fields.insert("media_type".to_string(), json!(media_type));
            }
            detail
        }
        Err(err) => {
            tracing::warn!("Error fetching details for media id {}: {}", id, err);
            summary
        }
    }
}

async fn build_carousel(client: &TmdbClient, region: &Region) -> Result<Value, UpstreamError> {
    let first_page = query_params([("page", "1".to_string())]);
    let (movies, tv) = tokio::join!(
        client.call(&["trending", "movie", "day"], &first_page, region),
        client.call(&["trending", "tv", "day"], &first_page, region),
    );

    let mut candidates = carousel_candidates(movies?, "movie");
    candidates.extend(carousel_candidates(tv?, "tv"));
    candidates.shuffle(&mut rand::thread_rng());
    candidates.truncate(CAROUSEL_SIZE);
    tracing::info!("Enriching {} carousel items", candidates.len());

    let items = join_all(
        candidates
            .into_iter()
            .map(|summary| enrich(client, summary, region)),
    )
    .await;
    Ok(Value::Array(items))
}

pub async fn get_carousel(
    query: Query<RegionQuery>,
    client: Data<TmdbClient>,
    cache: Data<ResponseCache>,
    default_region: Data<DefaultRegion>,
) -> Result<HttpResponse, ApiError> {
    let region = default_region.resolve(query.region.as_deref());
    let key = CacheKey::new("carousel").param("region", &region).build();

    respond_cached(
        &cache,
        key,
        "Error fetching carousel data",
        build_carousel(&client, &region),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_tagged_and_need_a_backdrop() {
        let list = json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "With", "backdrop_path": "/a.jpg"},
                {"id": 2, "title": "Null", "backdrop_path": null},
                {"id": 3, "title": "Missing"},
                {"id": 4, "title": "Empty", "backdrop_path": ""}
            ]
        });

        let candidates = carousel_candidates(list, "tv");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0]["id"], 1);
        assert_eq!(candidates[0]["media_type"], "tv");
    }

    #[test]
    fn malformed_lists_yield_nothing() {
        assert!(carousel_candidates(json!({"page": 1}), "movie").is_empty());
        assert!(carousel_candidates(json!([1, 2]), "movie").is_empty());
    }
}
