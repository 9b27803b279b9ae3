// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fisheye distortion removal
//!
//! Captcha images arrive with a radial distortion of unknown strength.
//! This module provides:
//! - The forward and inverse radial mappings
//! - A bounded search for the strength that best undoes the distortion
//! - [`FisheyePreprocessor`], the engine preprocessing step built on the search

pub mod distortion;
pub mod preprocessor;
pub mod search;

use thiserror::Error;

pub use distortion::{apply_fisheye, ease, make_noise, remove_fisheye, transparent_points};
pub use preprocessor::{FisheyePreprocessor, DEFAULT_PROBE_ROW};
pub use search::{distance_range, find_correction, Correction};

/// Errors produced by the distortion search
#[derive(Debug, Error)]
pub enum FisheyeError {
    /// No candidate strength beat the worst-case baseline
    #[error("Can not detect fisheye distance for image of width {width}")]
    DistortionNotFound { width: u32 },

    /// Probe row lies outside the image (configuration error)
    #[error("Probe row {row} is outside image of height {height}")]
    ProbeRowOutOfBounds { row: u32, height: u32 },
}
