// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Radial ("fisheye") distortion primitives
//!
//! Both directions share one coordinate mapping: a pixel at radius `r`
//! from the image center, with `r < distance`, is paired with the pixel at
//! radius `ease(r / distance) * distance` on the same ray. Forward
//! distortion *gathers* through that mapping, undistortion *scatters*
//! through it. Pixels at or beyond `distance` pass through unchanged.

use image::{Rgba, RgbaImage};

use super::FisheyeError;

/// Cubic easing used by the captcha generator
///
/// Identity outside `[0, 1]` on the high side, zero below it.
pub fn ease(s: f64) -> f64 {
    if s < 0.0 {
        0.0
    } else if s > 1.0 {
        s
    } else {
        -0.75 * s * s * s + 1.5 * s * s + 0.25 * s
    }
}

/// Map `(x, y)` through the radial easing for the given image size
///
/// Returns the input coordinate unchanged when it lies at or beyond the
/// distortion radius. Coordinates are truncated toward zero.
pub fn radial_map(x: i64, y: i64, width: u32, height: u32, distance: u32) -> (i64, i64) {
    let (mid_x, mid_y) = (i64::from(width / 2), i64::from(height / 2));
    let radius = f64::from(distance);
    let (rel_x, rel_y) = ((x - mid_x) as f64, (y - mid_y) as f64);
    let r = (rel_x * rel_x + rel_y * rel_y).sqrt();

    if r >= radius {
        return (x, y);
    }
    if r == 0.0 {
        return (mid_x, mid_y);
    }

    let scale = ease(r / radius) * radius / r;
    (mid_x + (scale * rel_x) as i64, mid_y + (scale * rel_y) as i64)
}

fn in_bounds(image: &RgbaImage, x: i64, y: i64) -> bool {
    x >= 0 && y >= 0 && x < i64::from(image.width()) && y < i64::from(image.height())
}

/// Apply the fisheye effect at the given strength
///
/// Every destination pixel inside the radius samples the source at its
/// mapped coordinate. Used to synthesize training noise only; the resolve
/// path never distorts.
pub fn apply_fisheye(src: &RgbaImage, distance: u32) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut dest = RgbaImage::new(width, height);

    for (x, y, pixel) in dest.enumerate_pixels_mut() {
        let (sx, sy) = radial_map(i64::from(x), i64::from(y), width, height, distance);
        *pixel = if in_bounds(src, sx, sy) {
            *src.get_pixel(sx as u32, sy as u32)
        } else {
            Rgba([0, 0, 0, 0])
        };
    }

    dest
}

/// Remove the fisheye effect assuming the given strength
///
/// Walks the source and scatters each pixel to its corrected position in a
/// freshly allocated, fully transparent image. Positions no source pixel
/// lands on stay transparent; some content near the exact center is lost.
pub fn remove_fisheye(src: &RgbaImage, distance: u32) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut dest = RgbaImage::new(width, height);

    for (x, y, pixel) in src.enumerate_pixels() {
        let (dx, dy) = radial_map(i64::from(x), i64::from(y), width, height, distance);
        if in_bounds(&dest, dx, dy) {
            dest.put_pixel(dx as u32, dy as u32, *pixel);
        }
    }

    dest
}

/// Distort then undistort at the same strength
///
/// The result carries the same losses a real corrected captcha does, which
/// is what a symbol model should be trained on.
pub fn make_noise(src: &RgbaImage, distance: u32) -> RgbaImage {
    remove_fisheye(&apply_fisheye(src, distance), distance)
}

/// Count fully transparent pixels on one row
///
/// Lower is better: holes left by the scatter mapping grow when the
/// assumed strength is wrong.
pub fn transparent_points(image: &RgbaImage, row: u32) -> Result<usize, FisheyeError> {
    if row >= image.height() {
        return Err(FisheyeError::ProbeRowOutOfBounds {
            row,
            height: image.height(),
        });
    }

    Ok((0..image.width())
        .filter(|&x| image.get_pixel(x, row)[3] == 0)
        .count())
}
