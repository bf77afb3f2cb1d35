//! Place-name resolution.
//!
//! Open-Meteo's geocoder is tried first; Nominatim is the fallback. The
//! query is attempted as given and, when it does not already mention
//! India, once more with ", India" appended, since the monitored sites
//! cluster there and the bare district name is often ambiguous.

use crate::{LookupClient, LookupError};
use serde::Deserialize;
use talus_data::GeoPlace;

const OPEN_METEO_GEOCODE: &str = "https://geocoding-api.open-meteo.com/v1/search";
const NOMINATIM: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Deserialize)]
struct MeteoResponse {
    #[serde(default)]
    results: Vec<MeteoHit>,
}

#[derive(Deserialize)]
struct MeteoHit {
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
    country: Option<String>,
}

#[derive(Deserialize)]
struct NominatimHit {
    display_name: Option<String>,
    lat: String,
    lon: String,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Deserialize, Default)]
struct NominatimAddress {
    state: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

/// The two query strings to attempt, in order.
fn candidates(query: &str) -> Vec<String> {
    let mut out = vec![query.to_string()];
    if !query.to_lowercase().contains("india") {
        out.push(format!("{query}, India"));
    }
    out
}

/// Prefers an India hit over the top-ranked one.
fn pick_meteo(hits: Vec<MeteoHit>) -> Option<MeteoHit> {
    let india = hits
        .iter()
        .position(|h| h.country.as_deref().is_some_and(|c| c.to_lowercase().contains("india")));
    let mut hits = hits;
    match india {
        Some(i) => Some(hits.swap_remove(i)),
        None => {
            if hits.is_empty() {
                None
            } else {
                Some(hits.swap_remove(0))
            }
        }
    }
}

impl LookupClient {
    /// Resolves a free-text place query to coordinates.
    ///
    /// Returns [`LookupError::NoMatch`] only after every provider and
    /// candidate query has been exhausted.
    pub async fn geocode(&self, query: &str) -> Result<GeoPlace, LookupError> {
        for q in candidates(query) {
            if let Some(place) = self.geocode_meteo(&q).await {
                return Ok(place);
            }
            tracing::debug!(candidate = %q, "Open-Meteo geocoder had no match, trying Nominatim");
            if let Some(place) = self.geocode_nominatim(&q).await {
                return Ok(place);
            }
        }
        tracing::warn!(query = %query, "Every geocoding provider and candidate exhausted");
        Err(LookupError::NoMatch(query.to_string()))
    }

    async fn geocode_meteo(&self, q: &str) -> Option<GeoPlace> {
        let response = self
            .http()
            .get(OPEN_METEO_GEOCODE)
            .query(&[("name", q), ("count", "10"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: MeteoResponse = response.json().await.ok()?;
        let hit = pick_meteo(body.results)?;
        Some(GeoPlace {
            name: hit.name,
            lat: hit.latitude,
            lon: hit.longitude,
            admin1: hit.admin1,
            country: hit.country,
        })
    }

    async fn geocode_nominatim(&self, q: &str) -> Option<GeoPlace> {
        let response = self
            .http()
            .get(NOMINATIM)
            .query(&[
                ("format", "jsonv2"),
                ("limit", "1"),
                ("addressdetails", "1"),
                ("q", q),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let hits: Vec<NominatimHit> = response.json().await.ok()?;
        let hit = hits.into_iter().next()?;
        let name = hit
            .display_name
            .as_deref()
            .and_then(|d| d.split(',').next())
            .unwrap_or(q)
            .trim()
            .to_string();
        Some(GeoPlace {
            name,
            lat: hit.lat.parse().ok()?,
            lon: hit.lon.parse().ok()?,
            admin1: hit.address.state.or(hit.address.county),
            country: hit.address.country,
        })
    }
}
