//! HTTP clients for the external collaborators: geocoding, elevation and
//! terrain-feature lookups, rainfall history, and the detection-inference
//! endpoint.
//!
//! Every call here is best-effort. Failures surface as [`LookupError`] and
//! callers substitute a neutral contribution; nothing in this crate retries
//! or panics. All futures are plain `reqwest` sends, so dropping a future
//! aborts the in-flight request — superseding a stale lookup is just
//! dropping its handle.

use reqwest::Client;
use std::time::Duration;

mod error;
mod geocode;
mod inference;
mod site;
mod weather;

pub use error::LookupError;
pub use inference::InferenceClient;

/// Identifies us to the OSM-family providers, which reject anonymous
/// clients.
const USER_AGENT: &str = concat!("talus/", env!("CARGO_PKG_VERSION"));

/// Default whole-request timeout; slow providers get a tighter
/// per-request override.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared client for the geospatial lookups.
pub struct LookupClient {
    client: Client,
}

impl LookupClient {
    pub fn new() -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}
