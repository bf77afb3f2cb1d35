//! Trailing rainfall totals from the Open-Meteo hourly archive.

use crate::{LookupClient, LookupError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use talus_data::RainfallSummary;

const OPEN_METEO_FORECAST: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Deserialize)]
struct ForecastResponse {
    hourly: Option<Hourly>,
}

#[derive(Deserialize)]
struct Hourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

/// Sums precipitation over the trailing 24h and 72h windows.
/// Timestamps are Open-Meteo hour labels in UTC ("2026-08-27T13:00").
fn sum_windows(times: &[String], precipitation: &[Option<f64>], now: DateTime<Utc>) -> RainfallSummary {
    let mut summary = RainfallSummary::default();
    for (label, amount) in times.iter().zip(precipitation) {
        let Ok(naive) = NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M") else {
            continue;
        };
        let age_hours = (now - naive.and_utc()).num_seconds() as f64 / 3600.0;
        if age_hours < 0.0 || age_hours > 72.0 {
            continue;
        }
        let amount = amount.unwrap_or(0.0);
        summary.rain72 += amount;
        if age_hours <= 24.0 {
            summary.rain24 += amount;
        }
    }
    summary
}

impl LookupClient {
    /// Fetches hourly precipitation for the past three days and reduces
    /// it to 24h/72h totals.
    pub async fn rainfall(&self, lat: f64, lon: f64) -> Result<RainfallSummary, LookupError> {
        let response = self
            .http()
            .get(OPEN_METEO_FORECAST)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", "precipitation".to_string()),
                ("past_days", "3".to_string()),
                ("forecast_days", "1".to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }
        let body: ForecastResponse = response.json().await?;
        let Some(hourly) = body.hourly else {
            return Ok(RainfallSummary::default());
        };
        Ok(sum_windows(&hourly.time, &hourly.precipitation, Utc::now()))
    }
}
