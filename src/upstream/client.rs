use reqwest::Client;
use serde_json::Value;
use url::{ParseError, Url};

use super::UpstreamError;
use crate::cache::QueryParams;
use crate::configuration::TmdbSettings;
use crate::region::Region;

/// Thin GET-only client for the TMDB v3 API. Every call carries the API key
/// and the caller's region; a single attempt is made per call.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    pub fn new(settings: &TmdbSettings) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::Url(ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
            api_key: settings.api_key.clone(),
        })
    }

    /// Appends `segments` to the base path one by one, so a `/`, `?` or `..`
    /// inside a segment is escaped instead of changing the endpoint.
    pub fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn call(
        &self,
        segments: &[&str],
        query: &QueryParams,
        region: &Region,
    ) -> Result<Value, UpstreamError> {
        let url = self.url_for(segments);
        let path = url.path().to_string();
        tracing::info!(upstream_path = %path, region = %region, "Calling TMDB");

        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .query(&[("region", region.as_str())])
            .send()
            .await
            .map_err(|err| {
                tracing::error!("TMDB request error for {}: {}", path, err);
                UpstreamError::Network(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            // provider errors look like {"status_code": 7, "status_message": "..."}
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body["status_message"].as_str().map(String::from));
            tracing::error!(
                "TMDB responded {} for {}: {}",
                status,
                path,
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|err| {
            tracing::error!("Failed to decode TMDB body for {}: {}", path, err);
            UpstreamError::Network(err)
        })
    }
}

/// Shorthand for building a parameter map from literal pairs.
pub fn query_params<const N: usize>(pairs: [(&str, String); N]) -> QueryParams {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
