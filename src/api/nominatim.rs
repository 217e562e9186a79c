//! Provides a geocoding client for OpenStreetMap Nominatim, restricted to the US.

use super::Fetcher;
use crate::error::Result;
use crate::models::{NominatimPlace, Place};
use tracing::{info, warn};

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub struct NominatimClient {
    fetcher: Fetcher,
    base_url: String,
}

impl NominatimClient {
    pub fn new(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a free-text query to at most `limit` US places, best match first.
    pub async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>> {
        info!("Geocoding '{}'", query);

        let url = format!("{}/search", self.base_url);
        let results: Vec<NominatimPlace> = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("q", query.to_string()),
                    ("format", "json".to_string()),
                    ("countrycodes", "us".to_string()),
                    ("limit", limit.max(1).to_string()),
                ],
            )
            .await?;

        Ok(results.into_iter().filter_map(place_from_result).collect())
    }
}

fn place_from_result(result: NominatimPlace) -> Option<Place> {
    match (result.lat.parse::<f64>(), result.lon.parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => Some(Place {
            name: result.display_name,
            latitude,
            longitude,
        }),
        _ => {
            warn!(
                "Skipping '{}' with unparseable coordinates ({}, {})",
                result.display_name, result.lat, result.lon
            );
            None
        },
    }
}
