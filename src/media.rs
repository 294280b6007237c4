//! Vocabulary shared by the proxy routes and the client data layer.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
        }
    }

    /// Discover uses a different release date field per media type.
    pub fn release_date_field(&self) -> &'static str {
        match self {
            MediaType::Tv => "first_air_date",
            _ => "primary_release_date",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Source list for the latest trailers row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailerFilter {
    #[default]
    Popular,
    Streaming,
    Theatres,
}

impl TrailerFilter {
    /// Unknown values fall back to `popular`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("streaming") => TrailerFilter::Streaming,
            Some("theatres") => TrailerFilter::Theatres,
            _ => TrailerFilter::Popular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrailerFilter::Popular => "popular",
            TrailerFilter::Streaming => "streaming",
            TrailerFilter::Theatres => "theatres",
        }
    }
}

/// Search scope accepted by `/api/search/{category}/{query}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    #[default]
    Multi,
    Movie,
    Tv,
    Person,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::Multi => "multi",
            SearchCategory::Movie => "movie",
            SearchCategory::Tv => "tv",
            SearchCategory::Person => "person",
        }
    }
}
