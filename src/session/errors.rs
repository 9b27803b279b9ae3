// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session error types

use thiserror::Error;

use crate::engine::EngineError;
use crate::image_utils::ImageError;

/// Terminal outcome of a captcha session other than success
#[derive(Debug, Error)]
pub enum SessionError {
    /// Fetching the captcha failed
    #[error("Captcha fetch failed: {0}")]
    Transport(#[source] anyhow::Error),

    /// A step exceeded the per-attempt timeout
    #[error("Timed out during {stage} after {timeout_ms}ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },

    #[error("Session cancelled")]
    Cancelled,

    /// Fetched bytes are not an image
    #[error("Captcha decode failed: {0}")]
    Decode(#[from] ImageError),

    /// The pipeline could not produce an answer
    #[error("Captcha resolve failed: {0}")]
    Resolve(#[from] EngineError),

    /// The answer consumer failed with something other than a rejection
    #[error("Answer consumer failed: {0}")]
    Consumer(#[source] anyhow::Error),

    /// Every attempt was rejected
    #[error("Retry limit exceeded after {attempts} attempts")]
    RetryLimitExceeded { attempts: u32 },

    /// The session HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Transport-level failures a batch caller may back off on
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SessionError::Transport(_) | SessionError::Timeout { .. } | SessionError::Client(_)
        )
    }
}

/// Result of handing an answer to the consumer
#[derive(Debug, Error)]
pub enum AnswerError {
    /// The remote system scored the answer as wrong; the only retry signal
    #[error("Captcha rejected")]
    Rejected,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
