// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod dataset;
pub mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Captcha engine CLI
#[derive(Parser, Debug)]
#[command(name = "captcha-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Resolve and inspect fisheye captchas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a captcha image with a remote symbol classifier
    Resolve(resolve::ResolveArgs),

    /// Remove fisheye distortion and save the corrected image
    Undistort(dataset::UndistortArgs),

    /// Write the segment crops (or position-marked canvases) of an image
    Segment(dataset::SegmentArgs),

    /// Synthesize a training-noise image at a given strength
    Noise(dataset::NoiseArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve(args) => resolve::resolve(args).await,
        Commands::Undistort(args) => dataset::undistort(args).await,
        Commands::Segment(args) => dataset::segment(args).await,
        Commands::Noise(args) => dataset::noise(args).await,
    }
}
