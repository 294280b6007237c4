use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::region::{DefaultRegion, Region, DEFAULT_REGION};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub tmdb: TmdbSettings,
    pub cache: CacheSettings,
    pub default_region: String,
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TmdbSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CacheSettings {
    pub ttl_seconds: u64,
    pub max_entries: Option<usize>,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TmdbSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Settings {
    pub fn default_region(&self) -> DefaultRegion {
        match Region::parse(&self.default_region) {
            Some(region) => DefaultRegion(region),
            None => {
                tracing::warn!(
                    "Configured default region `{}` is invalid, using {}",
                    self.default_region,
                    DEFAULT_REGION
                );
                DefaultRegion::default()
            }
        }
    }
}

/// Reads `<filename>.json` (optional) and layers `APP_*` environment
/// variables on top, e.g. `APP_CACHE__TTL_SECONDS=60`. `TMDB_API_KEY`
/// always wins for the provider key.
pub fn get_configuration(filename: &str) -> Result<Settings, config::ConfigError> {
    let builder = Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("tmdb.base_url", "https://api.themoviedb.org/3")?
        .set_default("tmdb.timeout_seconds", 30)?
        .set_default("cache.ttl_seconds", 600)?
        .set_default("default_region", DEFAULT_REGION)?
        .set_default("allowed_origins", vec!["http://localhost:5173"])?
        .add_source(File::new(filename, FileFormat::Json).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("allowed_origins"),
        )
        .set_override_option("tmdb.api_key", std::env::var("TMDB_API_KEY").ok())?;

    let config = builder.build()?;
    config.try_deserialize()
}
