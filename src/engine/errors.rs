// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the resolution pipeline

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::fisheye::FisheyeError;
use crate::image_utils::ImageError;
use crate::segment::SegmentError;

/// Errors that can occur while turning one image into an answer
#[derive(Debug, Error)]
pub enum EngineError {
    /// Distortion search found no acceptable strength
    #[error("Can not detect fisheye distance (image width {width})")]
    DistortionNotFound { width: u32 },

    /// Classifier failed on the crop at `position`
    #[error("Classifier failed at position {position}: {source}")]
    Classifier {
        position: usize,
        #[source]
        source: ClassifierError,
    },

    /// Misconfiguration (bad probe row, zero band width, ...)
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Input bytes are not a usable image
    #[error("Failed to decode captcha image: {0}")]
    Decode(#[from] ImageError),

    /// Classifier produced a label sequence that is not a valid answer
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    /// Custom preprocessing step failed
    #[error("Preprocessor {name} failed: {message}")]
    Preprocess { name: &'static str, message: String },
}

impl From<FisheyeError> for EngineError {
    fn from(err: FisheyeError) -> Self {
        match err {
            FisheyeError::DistortionNotFound { width } => EngineError::DistortionNotFound { width },
            FisheyeError::ProbeRowOutOfBounds { .. } => EngineError::InvalidConfig(err.to_string()),
        }
    }
}

impl From<SegmentError> for EngineError {
    fn from(err: SegmentError) -> Self {
        EngineError::InvalidConfig(err.to_string())
    }
}
