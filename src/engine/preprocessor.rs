// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Preprocessing step applied before segmentation

use image::RgbaImage;

use super::EngineError;

/// Transforms a captcha image before it is segmented
///
/// Implementations allocate a new image and never mutate the input.
pub trait Preprocessor: Send + Sync {
    fn transform(&self, image: &RgbaImage) -> Result<RgbaImage, EngineError>;

    /// Name used in logs and errors
    fn name(&self) -> &'static str;
}

/// Preprocessor that returns an unchanged copy
#[derive(Debug, Default, Clone)]
pub struct NoopPreprocessor;

impl Preprocessor for NoopPreprocessor {
    fn transform(&self, image: &RgbaImage) -> Result<RgbaImage, EngineError> {
        Ok(image.clone())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
