use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::QueryParams;
use crate::media::MediaType;
use crate::region::Region;

/// A title or person as returned by list endpoints. Fields the views do not
/// use are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaSummary {
    /// Movies carry a `title`, shows and people a `name`.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// The provider sends `""` for unknown dates.
    pub fn display_date(&self) -> Option<&str> {
        known_date(&self.release_date).or(known_date(&self.first_air_date))
    }

    pub fn is_person(&self) -> bool {
        self.media_type == Some(MediaType::Person)
    }
}

fn known_date(date: &Option<String>) -> Option<&str> {
    date.as_deref().filter(|date| !date.is_empty())
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "movieTitle", default)]
    pub movie_title: Option<String>,
}

fn present(value: &Value) -> Option<&Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn array(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn entry_for<'a>(entries: &'a Value, region: &Region) -> Option<&'a Value> {
    array(entries)
        .iter()
        .find(|entry| entry["iso_3166_1"].as_str() == Some(region.as_str()))
}

/// A title, show or person with its appended sub-resources. The set of
/// sub-resources depends on the media type and any of them may be missing,
/// so every accessor is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaDetail(pub Value);

impl MediaDetail {
    pub fn id(&self) -> Option<u64> {
        self.0["id"].as_u64()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        serde_json::from_value(self.0["media_type"].clone()).ok()
    }

    pub fn title(&self) -> Option<&str> {
        self.0["title"].as_str().or(self.0["name"].as_str())
    }

    pub fn sub_resource(&self, name: &str) -> Option<&Value> {
        present(&self.0[name])
    }

    pub fn credits(&self) -> Option<&Value> {
        self.sub_resource("credits")
            .or_else(|| self.sub_resource("combined_credits"))
    }

    pub fn videos(&self) -> &[Value] {
        array(&self.0["videos"]["results"])
    }

    pub fn backdrops(&self) -> &[Value] {
        array(&self.0["images"]["backdrops"])
    }

    pub fn similar(&self) -> &[Value] {
        array(&self.0["similar"]["results"])
    }

    pub fn recommendations(&self) -> &[Value] {
        array(&self.0["recommendations"]["results"])
    }

    pub fn reviews(&self) -> &[Value] {
        array(&self.0["reviews"]["results"])
    }

    pub fn watch_providers(&self, region: &Region) -> Option<&Value> {
        present(&self.0["watch/providers"]["results"][region.as_str()])
    }

    /// Age rating for `region`: movies read `release_dates`, shows read
    /// `content_ratings`.
    pub fn certification(&self, region: &Region) -> Option<&str> {
        if let Some(entry) = entry_for(&self.0["release_dates"]["results"], region) {
            return array(&entry["release_dates"])
                .iter()
                .filter_map(|release| release["certification"].as_str())
                .find(|certification| !certification.is_empty());
        }
        entry_for(&self.0["content_ratings"]["results"], region)
            .and_then(|entry| entry["rating"].as_str())
            .filter(|rating| !rating.is_empty())
    }

    /// False for carousel items that fell back to their list summary.
    pub fn is_enriched(&self) -> bool {
        self.sub_resource("images").is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonDetail(pub Value);

impl SeasonDetail {
    pub fn season_number(&self) -> Option<u64> {
        self.0["season_number"].as_u64()
    }

    pub fn episodes(&self) -> &[Value] {
        array(&self.0["episodes"])
    }

    pub fn videos(&self) -> &[Value] {
        array(&self.0["videos"]["results"])
    }

    pub fn watch_providers(&self, region: &Region) -> Option<&Value> {
        present(&self.0["watch/providers"]["results"][region.as_str()])
    }
}

pub const DEFAULT_SORT: &str = "popularity.desc";

/// Discover filters as edited in the UI. Translated to provider query
/// parameters only when a request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverFilters {
    pub providers: Vec<u64>,
    pub genres: Vec<u64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_by: String,
    pub vote_count_gte: Option<u32>,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            genres: Vec::new(),
            date_from: None,
            date_to: None,
            sort_by: DEFAULT_SORT.to_string(),
            vote_count_gte: None,
        }
    }
}

fn pipe_join(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

impl DiscoverFilters {
    /// Genres and providers are media-type specific and do not survive a
    /// switch between movies and shows.
    pub fn clear_selection(&mut self) {
        self.providers.clear();
        self.genres.clear();
    }

    pub fn to_query(&self, media_type: MediaType, region: &Region) -> QueryParams {
        let mut params = QueryParams::new();
        if !self.sort_by.is_empty() {
            params.insert("sort_by".into(), self.sort_by.clone());
        }
        if !self.genres.is_empty() {
            params.insert("with_genres".into(), pipe_join(&self.genres));
        }
        if !self.providers.is_empty() {
            params.insert("with_watch_providers".into(), pipe_join(&self.providers));
            params.insert("watch_region".into(), region.to_string());
        }
        let date_field = media_type.release_date_field();
        if let Some(from) = self.date_from {
            params.insert(
                format!("{}.gte", date_field),
                from.format("%Y-%m-%d").to_string(),
            );
        }
        if let Some(to) = self.date_to {
            params.insert(
                format!("{}.lte", date_field),
                to.format("%Y-%m-%d").to_string(),
            );
        }
        if let Some(votes) = self.vote_count_gte {
            params.insert("vote_count.gte".into(), votes.to_string());
        }
        params
    }
}
