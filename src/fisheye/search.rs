// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Distortion strength search

use image::RgbaImage;
use std::ops::RangeInclusive;
use tracing::debug;

use super::distortion::{remove_fisheye, transparent_points};
use super::FisheyeError;

/// Winning candidate of a strength search
#[derive(Debug, Clone)]
pub struct Correction {
    /// Undistorted image for `strength`
    pub image: RgbaImage,
    /// Distortion strength in pixels
    pub strength: u32,
    /// Transparent pixels on the probe row (lower is better)
    pub score: usize,
}

/// Candidate strengths for an image of the given width
///
/// The captcha generator never distorts outside a quarter to a third of the
/// image width.
pub fn distance_range(width: u32) -> RangeInclusive<u32> {
    width / 4..=width / 3
}

/// Find the strength whose undistortion leaves the fewest holes on `probe_row`
///
/// Candidates are tried in ascending order and only the running best is
/// kept; ties keep the lower strength. A candidate must beat the baseline
/// score of the full image width, otherwise the search reports
/// [`FisheyeError::DistortionNotFound`].
pub fn find_correction(src: &RgbaImage, probe_row: u32) -> Result<Correction, FisheyeError> {
    if probe_row >= src.height() {
        return Err(FisheyeError::ProbeRowOutOfBounds {
            row: probe_row,
            height: src.height(),
        });
    }

    let width = src.width();
    let mut best: Option<Correction> = None;

    for strength in distance_range(width) {
        let image = remove_fisheye(src, strength);
        let score = transparent_points(&image, probe_row)?;
        let threshold = best.as_ref().map_or(width as usize, |b| b.score);
        if score < threshold {
            best = Some(Correction {
                image,
                strength,
                score,
            });
        }
    }

    match best {
        Some(correction) => {
            debug!(
                "Fisheye search: strength={} score={} width={}",
                correction.strength, correction.score, width
            );
            Ok(correction)
        }
        None => Err(FisheyeError::DistortionNotFound { width }),
    }
}
