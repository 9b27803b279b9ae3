// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image-to-answer pipeline

use image::{DynamicImage, RgbaImage};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

use super::config::EngineConfig;
use super::errors::EngineError;
use super::preprocessor::Preprocessor;
use super::reporter::OutcomeReporter;
use super::types::CaptchaAnswer;
use crate::classifier::SymbolClassifier;
use crate::fisheye::FisheyePreprocessor;
use crate::image_utils::decode_image_bytes;
use crate::segment::segment;

/// Resolves captcha images into answers
///
/// The optional reporter is exposed through [`CaptchaEngine::reporter`] so
/// the session layer can test for the capability explicitly.
pub struct CaptchaEngine {
    config: EngineConfig,
    preprocessor: Option<Arc<dyn Preprocessor>>,
    classifier: Arc<dyn SymbolClassifier>,
    reporter: Option<Arc<dyn OutcomeReporter>>,
}

/// Builder for [`CaptchaEngine`]
pub struct EngineBuilder {
    config: EngineConfig,
    preprocessor: Option<Arc<dyn Preprocessor>>,
    fisheye: bool,
    classifier: Arc<dyn SymbolClassifier>,
    reporter: Option<Arc<dyn OutcomeReporter>>,
}

impl EngineBuilder {
    pub fn new(classifier: Arc<dyn SymbolClassifier>) -> Self {
        Self {
            config: EngineConfig::default(),
            preprocessor: None,
            fisheye: false,
            classifier,
            reporter: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom preprocessing step
    pub fn preprocessor(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessor = Some(preprocessor);
        self.fisheye = false;
        self
    }

    /// Use fisheye removal with the configured probe row
    pub fn fisheye(mut self) -> Self {
        self.preprocessor = None;
        self.fisheye = true;
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn OutcomeReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<CaptchaEngine, EngineError> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;

        let preprocessor = if self.fisheye {
            Some(Arc::new(FisheyePreprocessor::new(self.config.probe_row)) as Arc<dyn Preprocessor>)
        } else {
            self.preprocessor
        };

        Ok(CaptchaEngine {
            config: self.config,
            preprocessor,
            classifier: self.classifier,
            reporter: self.reporter,
        })
    }
}

impl CaptchaEngine {
    pub fn builder(classifier: Arc<dyn SymbolClassifier>) -> EngineBuilder {
        EngineBuilder::new(classifier)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reporting capability, if one was configured
    pub fn reporter(&self) -> Option<&dyn OutcomeReporter> {
        self.reporter.as_deref()
    }

    /// Decode raw image bytes and resolve them
    pub async fn resolve_bytes(&self, bytes: &[u8]) -> Result<CaptchaAnswer, EngineError> {
        let span = info_span!("resolve_bytes", size = bytes.len());
        async {
            let (image, info) = decode_image_bytes(bytes)?;
            debug!(
                "Decoded captcha: {}x{} {:?}",
                info.width, info.height, info.format
            );
            self.resolve_image(&image).await
        }
        .instrument(span)
        .await
    }

    /// Resolve a decoded image
    pub async fn resolve_image(&self, image: &DynamicImage) -> Result<CaptchaAnswer, EngineError> {
        self.resolve_rgba(&image.to_rgba8()).await
    }

    /// Preprocess, segment and classify one image
    ///
    /// Fails fast: the first preprocessing or classifier error is returned
    /// and no partial answer is produced.
    pub async fn resolve_rgba(&self, image: &RgbaImage) -> Result<CaptchaAnswer, EngineError> {
        let span = info_span!("resolve", width = image.width(), height = image.height());
        self.resolve_in_span(image).instrument(span).await
    }

    async fn resolve_in_span(&self, image: &RgbaImage) -> Result<CaptchaAnswer, EngineError> {
        let prepared = match &self.preprocessor {
            Some(preprocessor) => {
                let _entered = info_span!("preprocess", name = preprocessor.name()).entered();
                debug!("Preprocessing with {}", preprocessor.name());
                Cow::Owned(preprocessor.transform(image)?)
            }
            None => Cow::Borrowed(image),
        };

        let crops = segment(&prepared, self.config.expected_length, self.config.band_width)?;

        let symbols = if self.config.concurrent_classification {
            self.classify_concurrent(&crops).await?
        } else {
            self.classify_sequential(&crops).await?
        };

        let answer = CaptchaAnswer::new(symbols)?;
        debug!("Resolved captcha: {} ({} symbols)", answer, answer.len());
        Ok(answer)
    }

    async fn classify_one(&self, position: usize, crop: &RgbaImage) -> Result<String, EngineError> {
        self.classifier
            .resolve(crop)
            .instrument(info_span!("symbol_resolve", position))
            .await
            .map_err(|source| EngineError::Classifier { position, source })
    }

    async fn classify_sequential(&self, crops: &[RgbaImage]) -> Result<Vec<String>, EngineError> {
        let mut symbols = Vec::with_capacity(crops.len());
        for (position, crop) in crops.iter().enumerate() {
            symbols.push(self.classify_one(position, crop).await?);
        }
        Ok(symbols)
    }

    /// Results are collected by segment index, not completion order
    async fn classify_concurrent(&self, crops: &[RgbaImage]) -> Result<Vec<String>, EngineError> {
        let pending = crops
            .iter()
            .enumerate()
            .map(|(position, crop)| self.classify_one(position, crop));
        futures::future::try_join_all(pending).await
    }
}
