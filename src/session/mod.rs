// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Captcha session retry loop
//!
//! A session fetches a captcha, resolves it with a [`crate::engine::CaptchaEngine`],
//! hands the answer to an [`AnswerConsumer`] and retries while the remote
//! side rejects the answer.

pub mod config;
pub mod errors;
pub mod id;
pub mod runner;
pub mod source;

pub use config::SessionConfig;
pub use errors::{AnswerError, SessionError};
pub use id::{IdGenerator, UuidGenerator};
pub use runner::CaptchaSession;
pub use source::{AnswerConsumer, CaptchaSource, UrlCaptchaSource};
