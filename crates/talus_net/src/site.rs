//! Terrain lookups around a site: the elevation sample grid and the
//! Overpass feature census.

use crate::{LookupClient, LookupError};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use talus_data::FeatureCounts;

const OPEN_ELEVATION: &str = "https://api.open-elevation.com/api/v1/lookup";
const OVERPASS: &str = "https://overpass-api.de/api/interpreter";

const ELEVATION_TIMEOUT: Duration = Duration::from_secs(8);
const OVERPASS_TIMEOUT: Duration = Duration::from_secs(9);

/// Degree offsets on both axes; 5x5 grid, roughly 6 km across.
const GRID_OFFSETS: [f64; 5] = [-0.03, -0.015, 0.0, 0.015, 0.03];

#[derive(Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Vec<ElevationPoint>,
}

#[derive(Deserialize)]
struct ElevationPoint {
    elevation: f64,
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

fn grid_locations(lat: f64, lon: f64) -> String {
    let mut points = Vec::with_capacity(GRID_OFFSETS.len() * GRID_OFFSETS.len());
    for dx in GRID_OFFSETS {
        for dy in GRID_OFFSETS {
            points.push(format!("{:.5},{:.5}", lat + dx, lon + dy));
        }
    }
    points.join("|")
}

fn overpass_query(lat: f64, lon: f64) -> String {
    format!(
        "[out:json][timeout:25];(\
         node[\"natural\"=\"cliff\"](around:2500,{lat},{lon});\
         way[\"natural\"=\"cliff\"](around:2500,{lat},{lon});\
         relation[\"natural\"=\"cliff\"](around:2500,{lat},{lon});\
         node[\"landuse\"=\"quarry\"](around:4000,{lat},{lon});\
         way[\"landuse\"=\"quarry\"](around:4000,{lat},{lon});\
         way[\"man_made\"=\"cutting\"](around:2500,{lat},{lon});\
         );out body;"
    )
}

fn tally(elements: &[OverpassElement]) -> FeatureCounts {
    let mut counts = FeatureCounts::default();
    for element in elements {
        if element.tags.get("natural").map(String::as_str) == Some("cliff") {
            counts.cliff += 1;
        }
        if element.tags.get("landuse").map(String::as_str) == Some("quarry") {
            counts.quarry += 1;
        }
        if element.tags.get("man_made").map(String::as_str) == Some("cutting") {
            counts.cutting += 1;
        }
    }
    counts
}

impl LookupClient {
    /// Samples a 25-point elevation grid centered on the site.
    pub async fn elevation_grid(&self, lat: f64, lon: f64) -> Result<Vec<f64>, LookupError> {
        let response = self
            .http()
            .get(OPEN_ELEVATION)
            .query(&[("locations", grid_locations(lat, lon))])
            .timeout(ELEVATION_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }
        let body: ElevationResponse = response.json().await?;
        Ok(body.results.into_iter().map(|p| p.elevation).collect())
    }

    /// Counts cliffs, quarries, and cuttings near the site.
    pub async fn feature_counts(&self, lat: f64, lon: f64) -> Result<FeatureCounts, LookupError> {
        let response = self
            .http()
            .post(OVERPASS)
            .header("Content-Type", "text/plain")
            .body(overpass_query(lat, lon))
            .timeout(OVERPASS_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }
        let body: OverpassResponse = response.json().await?;
        Ok(tally(&body.elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_has_25_points() {
        let locations = grid_locations(21.9, 83.4);
        assert_eq!(locations.split('|').count(), 25);
        assert!(locations.starts_with("21.87000,83.37000"));
        assert!(locations.ends_with("21.93000,83.43000"));
    }

    #[test]
    fn test_overpass_query_radii() {
        let q = overpass_query(21.9, 83.4);
        assert!(q.contains("node[\"natural\"=\"cliff\"](around:2500,21.9,83.4)"));
        assert!(q.contains("node[\"landuse\"=\"quarry\"](around:4000,21.9,83.4)"));
        assert!(q.contains("way[\"man_made\"=\"cutting\"](around:2500,21.9,83.4)"));
        assert!(q.starts_with("[out:json]"));
    }

    #[test]
    fn test_tally_counts_by_tag() {
        let payload = r#"{"elements":[
            {"tags":{"natural":"cliff"}},
            {"tags":{"natural":"cliff","name":"Big Cliff"}},
            {"tags":{"landuse":"quarry"}},
            {"tags":{"man_made":"cutting"}},
            {"tags":{}},
            {}
        ]}"#;
        let parsed: OverpassResponse = serde_json::from_str(payload).unwrap();
        let counts = tally(&parsed.elements);
        assert_eq!(
            counts,
            FeatureCounts {
                cliff: 2,
                quarry: 1,
                cutting: 1
            }
        );
    }

    #[test]
    fn test_elevation_payload_parses() {
        let payload = r#"{"results":[{"latitude":21.9,"longitude":83.4,"elevation":217.0}]}"#;
        let parsed: ElevationResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].elevation, 217.0);
    }
}
