use serde::{Deserialize, Serialize};
use std::io::{Error, ErrorKind};

use crate::configuration::Settings;

/// Body of every non-2xx response the proxy produces.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    pub message: String,
}

pub fn check_for_necessary_env(settings: &Settings) -> std::io::Result<()> {
    if settings.tmdb.api_key.trim().is_empty() {
        return Err(Error::new(
            ErrorKind::NotFound,
            "TMDB_API_KEY must be set (or `tmdb.api_key` in configuration.json)",
        ));
    }
    Ok(())
}
