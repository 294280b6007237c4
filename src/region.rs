use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_REGION: &str = "US";

/// ISO 3166-1 alpha-2 country code used to scope watch providers,
/// release dates and certifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Accepts two ASCII letters in any case, surrounding whitespace ignored.
    pub fn parse(code: &str) -> Option<Region> {
        let code = code.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Region(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Region(DEFAULT_REGION.to_string())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Region::parse(&value).ok_or_else(|| format!("`{}` is not a valid region code", value))
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

/// Region to fall back on when a request carries no usable `region` parameter.
#[derive(Debug, Clone, Default)]
pub struct DefaultRegion(pub Region);

impl DefaultRegion {
    pub fn resolve(&self, requested: Option<&str>) -> Region {
        match requested.and_then(Region::parse) {
            Some(region) => region,
            None => {
                if let Some(raw) = requested.filter(|raw| !raw.trim().is_empty()) {
                    tracing::warn!("Ignoring invalid region `{}`, using {}", raw, self.0);
                }
                self.0.clone()
            }
        }
    }
}
