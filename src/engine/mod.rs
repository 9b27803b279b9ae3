// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Captcha resolution pipeline
//!
//! Composes an optional preprocessing step, the segmenter and an injected
//! per-character classifier into one image-to-answer operation.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod preprocessor;
pub mod reporter;
pub mod types;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use pipeline::{CaptchaEngine, EngineBuilder};
pub use preprocessor::{NoopPreprocessor, Preprocessor};
pub use reporter::{CollectingReporter, OutcomeReporter, TracingReporter};
pub use types::{Attempt, CaptchaAnswer, ReportRecord};
