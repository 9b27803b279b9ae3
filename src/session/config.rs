// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session retry configuration

use std::env;
use std::time::Duration;

/// Configuration for one captcha session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Retries after the first attempt; 0 means exactly one try
    pub retry_count: u32,
    /// Timeout applied to each fetch, resolve and submit step
    pub attempt_timeout_ms: u64,
    /// User-Agent header for the session client
    pub user_agent: Option<String>,
    /// Proxy URL for all session traffic
    pub proxy: Option<String>,
}

impl SessionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retry_count: env::var("CAPTCHA_RETRY_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_count),
            attempt_timeout_ms: env::var("CAPTCHA_ATTEMPT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.attempt_timeout_ms),
            user_agent: env::var("CAPTCHA_USER_AGENT").ok().filter(|v| !v.is_empty()),
            proxy: env::var("CAPTCHA_PROXY").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.attempt_timeout_ms == 0 {
            return Err("Attempt timeout must be greater than 0".to_string());
        }
        if let Some(proxy) = &self.proxy {
            if !proxy.contains("://") {
                return Err(format!("Proxy must be a URL: {}", proxy));
            }
        }
        Ok(())
    }

    /// Total number of attempts a session may make
    pub fn attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_count: 5,
            attempt_timeout_ms: 10_000,
            user_agent: None,
            proxy: None,
        }
    }
}
