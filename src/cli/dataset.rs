// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::fisheye::{find_correction, make_noise, DEFAULT_PROBE_ROW};
use crate::image_utils::{decode_image_bytes, encode_png};
use crate::segment::{position_images, segment as segment_image};

/// Arguments for undistort command
#[derive(Args, Debug)]
pub struct UndistortArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Row used to score candidate strengths
    #[arg(long, env = "FISHEYE_PROBE_ROW", default_value_t = DEFAULT_PROBE_ROW)]
    pub probe_row: u32,
}

/// Arguments for segment command
#[derive(Args, Debug)]
pub struct SegmentArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Directory receiving one PNG per position
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Number of characters in the captcha
    #[arg(long, env = "CAPTCHA_LENGTH", default_value_t = 5)]
    pub count: usize,

    /// Width of one band in pixels
    #[arg(long, env = "CAPTCHA_BAND_WIDTH", default_value_t = 10)]
    pub band_width: u32,

    /// Write full canvases with the band of each position marked
    #[arg(long)]
    pub mark: bool,
}

/// Arguments for noise command
#[derive(Args, Debug)]
pub struct NoiseArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Distortion strength in pixels
    #[arg(long)]
    pub distance: u32,
}

async fn load(path: &Path) -> Result<RgbaImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let (image, _) = decode_image_bytes(&bytes)?;
    Ok(image.to_rgba8())
}

async fn save(path: &Path, image: &RgbaImage) -> Result<()> {
    tokio::fs::write(path, encode_png(image)?)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

/// Remove fisheye distortion from one image
pub async fn undistort(args: UndistortArgs) -> Result<()> {
    let src = load(&args.input).await?;
    let correction = find_correction(&src, args.probe_row)?;
    save(&args.output, &correction.image).await?;

    println!(
        "✅ strength={} score={} -> {}",
        correction.strength,
        correction.score,
        args.output.display()
    );
    Ok(())
}

/// Write segment crops, or marked canvases with `--mark`
pub async fn segment(args: SegmentArgs) -> Result<()> {
    let src = load(&args.input).await?;
    let images = if args.mark {
        position_images(&src, args.count, args.band_width)?
    } else {
        segment_image(&src, args.count, args.band_width)?
    };

    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    for (position, image) in images.iter().enumerate() {
        let path = args.output_dir.join(format!("{}.png", position));
        save(&path, image).await?;
    }

    info!(
        "Wrote {} images ({}) to {}",
        images.len(),
        if args.mark { "marked" } else { "crops" },
        args.output_dir.display()
    );
    println!("✅ {} images -> {}", images.len(), args.output_dir.display());
    Ok(())
}

/// Synthesize a lossy training image
pub async fn noise(args: NoiseArgs) -> Result<()> {
    let src = load(&args.input).await?;
    let noisy = make_noise(&src, args.distance);
    save(&args.output, &noisy).await?;

    println!("✅ distance={} -> {}", args.distance, args.output.display());
    Ok(())
}
