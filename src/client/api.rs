use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{ClientError, RegionContext};
use crate::cache::QueryParams;
use crate::media::{MediaType, SearchCategory, TimeWindow, TrailerFilter};
use crate::util::ResponseMessage;

/// Curated lists served under `/api/{list}/{media_type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Popular,
    TopRated,
    NowPlaying,
}

impl ListKind {
    pub fn route(&self) -> &'static str {
        match self {
            ListKind::Popular => "popular",
            ListKind::TopRated => "top-rated",
            ListKind::NowPlaying => "now-playing",
        }
    }
}

/// One proxy route together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    HomepageCarousel,
    /// `media: None` asks for every media type.
    Trending {
        media: Option<MediaType>,
        window: TimeWindow,
        page: u32,
    },
    Listing {
        list: ListKind,
        media_type: MediaType,
        page: u32,
    },
    LatestTrailers {
        filter: TrailerFilter,
    },
    Details {
        media_type: MediaType,
        id: u64,
    },
    Season {
        show_id: u64,
        season_number: u32,
    },
    Search {
        category: SearchCategory,
        query: String,
        page: u32,
    },
    /// `params` are sent as-is, page included.
    Discover {
        media_type: MediaType,
        params: QueryParams,
    },
    Person {
        id: u64,
    },
}

impl Endpoint {
    /// Path segments below `/api`.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Endpoint::HomepageCarousel => vec!["homepage".into(), "carousel".into()],
            Endpoint::Trending { media, .. } => vec![
                "trending".into(),
                media.map(|media| media.as_str()).unwrap_or("all").into(),
            ],
            Endpoint::Listing {
                list, media_type, ..
            } => vec![list.route().into(), media_type.as_str().into()],
            Endpoint::LatestTrailers { .. } => vec!["latest-trailers".into()],
            Endpoint::Details { media_type, id } => {
                vec!["details".into(), media_type.as_str().into(), id.to_string()]
            }
            Endpoint::Season {
                show_id,
                season_number,
            } => vec![
                "details".into(),
                "tv".into(),
                show_id.to_string(),
                "season".into(),
                season_number.to_string(),
            ],
            Endpoint::Search {
                category, query, ..
            } => vec!["search".into(), category.as_str().into(), query.clone()],
            Endpoint::Discover { media_type, .. } => {
                vec!["discover".into(), media_type.as_str().into()]
            }
            Endpoint::Person { id } => vec!["person".into(), id.to_string()],
        }
    }

    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            Endpoint::Trending { window, page, .. } => vec![
                ("time_window".into(), window.as_str().into()),
                ("page".into(), page.to_string()),
            ],
            Endpoint::Listing { page, .. } | Endpoint::Search { page, .. } => {
                vec![("page".into(), page.to_string())]
            }
            Endpoint::LatestTrailers { filter } => vec![("filter".into(), filter.as_str().into())],
            Endpoint::Discover { params, .. } => params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Readable `path?query` form, used in logs.
    pub fn describe(&self) -> String {
        let path = self.segments().join("/");
        let query = self
            .query()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>();
        if query.is_empty() {
            path
        } else {
            format!("{}?{}", path, query.join("&"))
        }
    }
}

/// Data access for the views. Implementations resolve to the `data` member
/// of the proxy envelope and must give up with [`ClientError::Cancelled`]
/// once `cancel` fires.
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError>;
}

pub async fn fetch_as<T, A>(
    api: &A,
    endpoint: &Endpoint,
    cancel: &CancellationToken,
) -> Result<T, ClientError>
where
    T: DeserializeOwned,
    A: MediaApi + ?Sized,
{
    let data = api.fetch(endpoint, cancel).await?;
    Ok(serde_json::from_value(data)?)
}

/// [`MediaApi`] over HTTP against a running proxy.
#[derive(Debug, Clone)]
pub struct ProxyApi {
    http: reqwest::Client,
    base_url: Url,
    region: RegionContext,
}

impl ProxyApi {
    pub fn new(base_url: &str, region: RegionContext) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            region,
        })
    }

    pub fn region(&self) -> &RegionContext {
        &self.region
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(endpoint.segments());
        url.query_pairs_mut()
            .extend_pairs(endpoint.query())
            .append_pair("region", self.region.code());
        Ok(url)
    }

    async fn send(&self, url: Url) -> Result<Value, ClientError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ResponseMessage>().await {
                Ok(body) => body.message,
                Err(_) => format!("Request failed with status code {}", status.as_u16()),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let mut body: Value = response.json().await?;
        Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl MediaApi for ProxyApi {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let url = self.url_for(endpoint)?;
        tracing::debug!("GET {}", url);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.send(url) => result,
        }
    }
}
