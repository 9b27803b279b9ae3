// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::classifier::{Labels, RemoteClassifier, RemoteClassifierConfig};
use crate::engine::{CaptchaEngine, EngineConfig};

/// Arguments for resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Captcha image file
    #[arg(long)]
    pub input: PathBuf,

    /// Label file, one label per line in model output order
    #[arg(long, env = "CLASSIFIER_LABELS")]
    pub labels: PathBuf,

    /// Prediction service base URL
    #[arg(long, env = "CLASSIFIER_URL")]
    pub classifier_url: Option<String>,

    /// Served model name
    #[arg(long, env = "CLASSIFIER_MODEL")]
    pub model: Option<String>,

    /// Skip fisheye removal
    #[arg(long)]
    pub no_fisheye: bool,
}

/// Resolve one captcha file and print the answer as JSON
pub async fn resolve(args: ResolveArgs) -> Result<()> {
    let labels = Labels::from_file(&args.labels)
        .with_context(|| format!("reading labels from {}", args.labels.display()))?;

    let mut classifier_config = RemoteClassifierConfig::from_env();
    if let Some(url) = args.classifier_url {
        classifier_config.base_url = url;
    }
    if let Some(model) = args.model {
        classifier_config.model = model;
    }
    let classifier = RemoteClassifier::new(labels, &classifier_config)?;

    let mut builder =
        CaptchaEngine::builder(Arc::new(classifier)).config(EngineConfig::from_env());
    if !args.no_fisheye {
        builder = builder.fisheye();
    }
    let engine = builder.build()?;

    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("reading {}", args.input.display()))?;
    let answer = engine.resolve_bytes(&bytes).await?;
    info!("Resolved {} -> {}", args.input.display(), answer);

    println!("{}", serde_json::to_string(&answer)?);
    Ok(())
}
