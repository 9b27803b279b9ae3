// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for fixed-band segmentation

use captcha_engine::segment::{
    position_images, segment, working_canvas, SegmentError, MARKER_COLOR,
};
use image::{Rgba, RgbaImage};

fn textured(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 200, 255]))
}

#[test]
fn test_concrete_scenario_shapes() {
    let src = textured(200, 60);
    let canvas = working_canvas(&src, 5, 10).unwrap();
    assert_eq!(canvas.dimensions(), (50, 60));

    let crops = segment(&src, 5, 10).unwrap();
    assert_eq!(crops.len(), 5);
    assert!(crops.iter().all(|c| c.dimensions() == (10, 60)));
}

#[test]
fn test_bands_reconstruct_canvas() {
    // Widths at, above and below count * band_width - band_width
    for (width, count, band_width) in [(40u32, 5usize, 10u32), (12, 3, 4), (3, 4, 2), (1, 1, 7)] {
        let src = textured(width, 9);
        let canvas = working_canvas(&src, count, band_width).unwrap();
        let crops = segment(&src, count, band_width).unwrap();
        assert_eq!(crops.len(), count);

        for (i, crop) in crops.iter().enumerate() {
            assert_eq!(crop.dimensions(), (band_width, 9));
            for (x, y, pixel) in crop.enumerate_pixels() {
                let cx = i as u32 * band_width + x;
                assert_eq!(pixel, canvas.get_pixel(cx, y));
            }
        }
    }
}

#[test]
fn test_band_carries_source_columns() {
    let (count, band_width) = (5usize, 10u32);
    let src = textured(200, 60);
    let crops = segment(&src, count, band_width).unwrap();

    // Band 0 is the left pad; band i covers source columns [(i-1)*bw, i*bw).
    assert!(crops[0].pixels().all(|p| p[3] == 0));
    for (i, crop) in crops.iter().enumerate().skip(1) {
        let offset = (i as u32 - 1) * band_width;
        for (x, y, pixel) in crop.enumerate_pixels() {
            assert_eq!(pixel, src.get_pixel(offset + x, y), "band {} at ({}, {})", i, x, y);
        }
    }
}

#[test]
fn test_narrow_source_leaves_trailing_bands_empty() {
    let src = textured(15, 4);
    let crops = segment(&src, 4, 10).unwrap();
    assert_eq!(crops.len(), 4);
    assert!(crops[1].pixels().all(|p| p[3] == 255));
    assert_eq!(crops[2].get_pixel(4, 0), src.get_pixel(14, 0));
    assert_eq!(crops[2].get_pixel(5, 0)[3], 0);
    assert!(crops[3].pixels().all(|p| p[3] == 0));
}

#[test]
fn test_canvas_clips_source_on_the_right() {
    let src = textured(30, 5);
    let canvas = working_canvas(&src, 2, 10).unwrap();
    assert_eq!(canvas.dimensions(), (20, 5));
    for x in 0..10 {
        assert_eq!(canvas.get_pixel(x, 0)[3], 0);
        assert_eq!(canvas.get_pixel(x + 10, 2), src.get_pixel(x, 2));
    }
}

#[test]
fn test_recognition_crops_are_unmarked() {
    let crops = segment(&textured(50, 8), 3, 5).unwrap();
    for crop in &crops {
        assert!(crop.pixels().all(|p| *p != MARKER_COLOR));
    }
}

#[test]
fn test_position_images_do_not_share_marks() {
    let images = position_images(&textured(10, 4), 2, 3).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(*images[0].get_pixel(0, 0), MARKER_COLOR);
    assert_eq!(images[0].get_pixel(3, 0)[3], 0);
    assert_eq!(*images[1].get_pixel(3, 0), MARKER_COLOR);
    assert_eq!(images[1].get_pixel(0, 0)[3], 0);
}

#[test]
fn test_invalid_parameters() {
    let src = textured(10, 10);
    assert_eq!(segment(&src, 2, 0), Err(SegmentError::InvalidBandWidth));
    assert_eq!(position_images(&src, 2, 0), Err(SegmentError::InvalidBandWidth));
    assert_eq!(segment(&src, 0, 10), Ok(vec![]));
    assert!(matches!(
        segment(&src, usize::MAX, 10),
        Err(SegmentError::CanvasTooWide { .. })
    ));
}
