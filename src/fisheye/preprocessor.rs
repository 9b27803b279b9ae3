// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fisheye removal as an engine preprocessing step

use image::RgbaImage;
use tracing::info;

use super::search::find_correction;
use crate::engine::{EngineError, Preprocessor};

/// Default probe row used by the captcha provider's layout
pub const DEFAULT_PROBE_ROW: u32 = 42;

/// Preprocessor that searches for and removes the fisheye distortion
#[derive(Debug, Clone)]
pub struct FisheyePreprocessor {
    probe_row: u32,
}

impl FisheyePreprocessor {
    /// Create a preprocessor scoring candidates on `probe_row`
    pub fn new(probe_row: u32) -> Self {
        Self { probe_row }
    }

    /// Row used to score candidate strengths
    pub fn probe_row(&self) -> u32 {
        self.probe_row
    }
}

impl Default for FisheyePreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ROW)
    }
}

impl Preprocessor for FisheyePreprocessor {
    fn transform(&self, image: &RgbaImage) -> Result<RgbaImage, EngineError> {
        let correction = find_correction(image, self.probe_row)?;
        info!(
            "Fisheye preprocess: strength={} score={}",
            correction.strength, correction.score
        );
        Ok(correction.image)
    }

    fn name(&self) -> &'static str {
        "fisheye"
    }
}
