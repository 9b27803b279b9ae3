// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the resolution pipeline

use std::env;

use crate::fisheye::preprocessor::DEFAULT_PROBE_ROW;

/// Configuration for the resolution pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of characters in every captcha of this session
    pub expected_length: usize,
    /// Width of one segment band in pixels
    pub band_width: u32,
    /// Row used to score fisheye strength candidates
    pub probe_row: u32,
    /// Classify the crops of one image concurrently
    pub concurrent_classification: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expected_length: env::var("CAPTCHA_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expected_length),
            band_width: env::var("CAPTCHA_BAND_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.band_width),
            probe_row: env::var("FISHEYE_PROBE_ROW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.probe_row),
            concurrent_classification: env::var("CAPTCHA_CONCURRENT_CLASSIFY")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.concurrent_classification),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.expected_length == 0 {
            return Err("Expected captcha length must be greater than 0".to_string());
        }
        if self.band_width == 0 {
            return Err("Band width must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expected_length: 5,
            band_width: 10,
            probe_row: DEFAULT_PROBE_ROW,
            concurrent_classification: false,
        }
    }
}
