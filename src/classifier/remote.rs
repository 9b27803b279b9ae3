// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote symbol classifier backed by a TensorFlow Serving-style predict API

use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use super::{ClassifierError, Labels, SymbolClassifier};

/// Channel scale matching 16-bit color samples the model was trained on
const CHANNEL_SCALE: f32 = 257.0;

/// Configuration for [`RemoteClassifier`]
#[derive(Debug, Clone)]
pub struct RemoteClassifierConfig {
    /// Base URL of the prediction service
    pub base_url: String,
    /// Served model name
    pub model: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl RemoteClassifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("CLASSIFIER_URL").unwrap_or(defaults.base_url),
            model: env::var("CLASSIFIER_MODEL").unwrap_or(defaults.model),
            timeout_ms: env::var("CLASSIFIER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
        }
    }

    /// Full predict endpoint for the configured model
    pub fn predict_url(&self) -> String {
        format!(
            "{}/v1/models/{}:predict",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for RemoteClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8501".to_string(),
            model: "resnet".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Vec<Vec<[f32; 4]>>>,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

/// Convert a crop into a `[1, height, width, 4]` tensor
pub fn image_to_tensor(image: &RgbaImage) -> Vec<Vec<Vec<[f32; 4]>>> {
    let rows = image
        .rows()
        .map(|row| {
            row.map(|p| {
                [
                    f32::from(p[0]) * CHANNEL_SCALE,
                    f32::from(p[1]) * CHANNEL_SCALE,
                    f32::from(p[2]) * CHANNEL_SCALE,
                    f32::from(p[3]) * CHANNEL_SCALE,
                ]
            })
            .collect()
        })
        .collect();
    vec![rows]
}

/// Client for a remote prediction service
pub struct RemoteClassifier {
    client: Client,
    predict_url: String,
    labels: Labels,
}

impl RemoteClassifier {
    /// Create a new remote classifier
    pub fn new(labels: Labels, config: &RemoteClassifierConfig) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::InvalidInput(
                "labels must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self::with_client(client, labels, config))
    }

    /// Create a classifier that reuses an existing HTTP client
    pub fn with_client(client: Client, labels: Labels, config: &RemoteClassifierConfig) -> Self {
        let predict_url = config.predict_url();
        info!(
            "Remote classifier configured: url={}, labels={}",
            predict_url,
            labels.len()
        );
        Self {
            client,
            predict_url,
            labels,
        }
    }

    /// Get the predict endpoint
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl SymbolClassifier for RemoteClassifier {
    async fn resolve(&self, image: &RgbaImage) -> Result<String, ClassifierError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ClassifierError::InvalidInput(format!(
                "empty crop {}x{}",
                image.width(),
                image.height()
            )));
        }

        let request = PredictRequest {
            instances: image_to_tensor(image),
        };
        debug!("Classifier predict POST {}", self.predict_url);

        let response = self
            .client
            .post(&self.predict_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let data: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
        let probabilities = data
            .predictions
            .first()
            .ok_or_else(|| ClassifierError::MalformedResponse("empty predictions".to_string()))?;

        self.labels.best_match(probabilities)
    }
}
