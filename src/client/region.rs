use crate::region::Region;

/// The visitor's region, resolved once and handed to the API client and the
/// hooks that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionContext {
    region: Region,
}

impl RegionContext {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Reads a persisted preference. Both a bare code (`GB`) and a
    /// JSON-encoded string (`"GB"`) are accepted; anything else, or nothing,
    /// yields the default region.
    pub fn from_stored(stored: Option<&str>) -> Self {
        let region = stored
            .and_then(|raw| {
                Region::parse(raw).or_else(|| {
                    serde_json::from_str::<String>(raw)
                        .ok()
                        .and_then(|decoded| Region::parse(&decoded))
                })
            })
            .unwrap_or_default();
        Self { region }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn code(&self) -> &str {
        self.region.as_str()
    }
}
