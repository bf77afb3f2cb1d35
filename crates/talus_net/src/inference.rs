//! Client for the hosted rock-detection inference endpoint.

use crate::LookupError;
use reqwest::Client;
use std::time::Duration;
use talus_data::{Detection, InferenceResult};

const DETECT_BASE: &str = "https://detect.roboflow.com";
const INFER_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts camera frames to a hosted detection model.
pub struct InferenceClient {
    client: Client,
    base_url: String,
    model_id: String,
    api_key: Option<String>,
}

impl InferenceClient {
    pub fn new(model_id: impl Into<String>, api_key: Option<String>) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(INFER_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: DETECT_BASE.to_string(),
            model_id: model_id.into(),
            api_key,
        })
    }

    /// Points the client at a different host. Used by tests and
    /// self-hosted deployments.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key;
    }

    /// Runs one frame through the model and returns its detection boxes.
    pub async fn infer_image(&self, image: Vec<u8>) -> Result<Vec<Detection>, LookupError> {
        let key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, self.model_id);
        let response = self
            .client
            .post(&url)
            .query(&[("api_key", key), ("format", "json")])
            .body(image)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }
        let result: InferenceResult = response.json().await?;
        Ok(result.predictions)
    }
}
