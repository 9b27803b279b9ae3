// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types shared by the engine and the session loop

use serde::Serialize;
use std::fmt;

use super::EngineError;

/// Recognized captcha, one symbol per segment in left-to-right order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaAnswer {
    #[serde(rename = "captcha")]
    text: String,
    #[serde(skip)]
    symbols: Vec<String>,
}

impl CaptchaAnswer {
    /// Build an answer from per-segment labels
    pub fn new(symbols: Vec<String>) -> Result<Self, EngineError> {
        if symbols.is_empty() {
            return Err(EngineError::InvalidAnswer(
                "answer must contain at least one symbol".to_string(),
            ));
        }
        Ok(Self {
            text: symbols.concat(),
            symbols,
        })
    }

    /// Concatenated answer text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Per-segment labels
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of segments the answer was built from
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for CaptchaAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Identity of one fetch/resolve/submit attempt inside a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based attempt number
    pub number: u32,
    /// Correlation id, present when an id generator is configured
    pub id: Option<String>,
}

impl Attempt {
    pub fn new(number: u32, id: Option<String>) -> Self {
        Self { number, id }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "#{} ({})", self.number, id),
            None => write!(f, "#{}", self.number),
        }
    }
}

/// Outcome emitted to a reporter at most once per attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub answer: String,
    pub accepted: bool,
    pub attempt_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
}
