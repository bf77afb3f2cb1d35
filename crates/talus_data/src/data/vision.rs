use serde::{Deserialize, Serialize};

/// One detection box from the external inference call, in source-image
/// pixel space. `x`/`y` is the box center.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "class")]
    pub class_name: String,
    /// 0.0-1.0
    pub confidence: f64,
}

/// Response envelope of the detection endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InferenceResult {
    #[serde(default)]
    pub predictions: Vec<Detection>,
}
