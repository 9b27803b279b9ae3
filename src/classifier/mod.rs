// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-character symbol classification
//!
//! The engine only depends on [`SymbolClassifier`]. [`RemoteClassifier`] is
//! the production implementation backed by a remote prediction service.

pub mod labels;
pub mod remote;

use async_trait::async_trait;
use image::RgbaImage;
use thiserror::Error;

pub use labels::Labels;
pub use remote::{image_to_tensor, RemoteClassifier, RemoteClassifierConfig};

/// Errors that can occur while classifying a single crop
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Transport-level failure talking to the prediction service
    #[error("Prediction request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Prediction service answered with a non-success status
    #[error("Prediction service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),

    /// Label table and probability vector disagree in length
    #[error("Length mismatch between {labels} labels and {probabilities} probabilities")]
    LabelMismatch { labels: usize, probabilities: usize },

    /// Input the classifier cannot handle
    #[error("Invalid classifier input: {0}")]
    InvalidInput(String),

    /// Any other backend failure
    #[error("Classifier backend error: {0}")]
    Backend(String),
}

/// Recognizes the symbol shown in one segment crop
///
/// Implementations must be safe to call concurrently; the engine may
/// classify the crops of one captcha in parallel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SymbolClassifier: Send + Sync {
    /// Return the raw label for `image`
    async fn resolve(&self, image: &RgbaImage) -> Result<String, ClassifierError>;
}
