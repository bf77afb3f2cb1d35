use serde::{Deserialize, Serialize};

/// A geocoded place returned by the lookup chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeoPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub admin1: Option<String>,
    pub country: Option<String>,
}

impl GeoPlace {
    /// "Name, Admin1, Country" with absent parts skipped.
    #[must_use]
    pub fn pretty(&self) -> String {
        let mut out = self.name.clone();
        if let Some(a) = &self.admin1 {
            out.push_str(", ");
            out.push_str(a);
        }
        if let Some(c) = &self.country {
            out.push_str(", ");
            out.push_str(c);
        }
        out
    }
}

/// Counts of hazard-relevant map features near a site.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureCounts {
    pub cliff: u32,
    pub quarry: u32,
    pub cutting: u32,
}

impl FeatureCounts {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.cliff + self.quarry + self.cutting
    }
}

/// Accumulated precipitation over the trailing 24 and 72 hours, mm.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct RainfallSummary {
    pub rain24: f64,
    pub rain72: f64,
}
