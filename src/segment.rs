// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic character segmentation
//!
//! Recognition works on a canvas exactly `count * band_width` wide: the
//! source is shifted right by one band, leaving `band_width` transparent
//! columns on the left, and clipped at the right edge. Band `i` is the
//! canvas column range `[i * band_width, (i + 1) * band_width)` over the
//! full height, so band `i >= 1` carries source columns
//! `[(i - 1) * band_width, i * band_width)`. The segment count is always
//! the caller's expected length and never inferred from image content.

use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

/// Opaque marker color used to tag a band in position datasets
pub const MARKER_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Segmentation configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Band width must be greater than 0")]
    InvalidBandWidth,

    #[error("Canvas width overflows for {count} bands of {band_width}px")]
    CanvasTooWide { count: usize, band_width: u32 },
}

fn pad_width(count: usize, band_width: u32) -> Result<u32, SegmentError> {
    if band_width == 0 {
        return Err(SegmentError::InvalidBandWidth);
    }
    u32::try_from(count)
        .ok()
        .and_then(|c| c.checked_mul(band_width))
        .ok_or(SegmentError::CanvasTooWide { count, band_width })
}

/// Widen `src` by `count * band_width` transparent columns on the left
///
/// The original content is shifted right by the pad; the height is kept.
/// This is the layout of position-marked dataset images.
pub fn expand_left(
    src: &RgbaImage,
    count: usize,
    band_width: u32,
) -> Result<RgbaImage, SegmentError> {
    let pad = pad_width(count, band_width)?;
    let width = src
        .width()
        .checked_add(pad)
        .ok_or(SegmentError::CanvasTooWide { count, band_width })?;

    let mut canvas = RgbaImage::new(width, src.height());
    imageops::replace(&mut canvas, src, i64::from(pad), 0);
    Ok(canvas)
}

/// Build the `count * band_width` wide recognition canvas
pub fn working_canvas(
    src: &RgbaImage,
    count: usize,
    band_width: u32,
) -> Result<RgbaImage, SegmentError> {
    let width = pad_width(count, band_width)?;
    let mut canvas = RgbaImage::new(width, src.height());
    imageops::replace(&mut canvas, src, i64::from(band_width), 0);
    Ok(canvas)
}

/// Cut `count` equal-width bands, left to right
///
/// Each band is an independent copy of `band_width` x `src.height()`
/// pixels. No marking is applied.
pub fn segment(
    src: &RgbaImage,
    count: usize,
    band_width: u32,
) -> Result<Vec<RgbaImage>, SegmentError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let canvas = working_canvas(src, count, band_width)?;
    let height = canvas.height();

    Ok((0..count as u32)
        .map(|i| imageops::crop_imm(&canvas, i * band_width, 0, band_width, height).to_image())
        .collect())
}

/// Flood the column range of band `position` with [`MARKER_COLOR`]
///
/// Columns past the right edge are ignored. Only meant for datasets that
/// teach a position classifier.
pub fn mark_position(canvas: &mut RgbaImage, band_width: u32, position: u32) {
    let start = band_width.saturating_mul(position);
    let end = start.saturating_add(band_width).min(canvas.width());

    for y in 0..canvas.height() {
        for x in start..end {
            canvas.put_pixel(x, y, MARKER_COLOR);
        }
    }
}

/// One left-expanded canvas per position, each with its own band marked
///
/// Copy `i` shows which part of the pad output position `i` stands for.
pub fn position_images(
    src: &RgbaImage,
    count: usize,
    band_width: u32,
) -> Result<Vec<RgbaImage>, SegmentError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let canvas = expand_left(src, count, band_width)?;
    Ok((0..count as u32)
        .map(|position| {
            let mut marked = canvas.clone();
            mark_position(&mut marked, band_width, position);
            marked
        })
        .collect())
}
