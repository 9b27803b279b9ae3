// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session collaborators: captcha source and answer consumer

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use super::errors::AnswerError;
use crate::engine::Attempt;

/// Fetches one fresh captcha image per attempt
///
/// Implementations must issue requests through `client` so cookies set by
/// the remote side carry over to later attempts and to the consumer.
#[async_trait]
pub trait CaptchaSource: Send + Sync {
    async fn fetch(&self, client: &Client, attempt: &Attempt) -> anyhow::Result<Bytes>;
}

/// Uses a resolved answer against the remote system
///
/// Returning [`AnswerError::Rejected`] retries the session; any other error
/// ends it.
#[async_trait]
pub trait AnswerConsumer: Send + Sync {
    type Output: Send;

    async fn consume(
        &self,
        client: &Client,
        answer: &str,
        attempt: &Attempt,
    ) -> Result<Self::Output, AnswerError>;
}

#[async_trait]
impl<T: CaptchaSource + ?Sized> CaptchaSource for Arc<T> {
    async fn fetch(&self, client: &Client, attempt: &Attempt) -> anyhow::Result<Bytes> {
        (**self).fetch(client, attempt).await
    }
}

#[async_trait]
impl<T: AnswerConsumer + ?Sized> AnswerConsumer for Arc<T> {
    type Output = T::Output;

    async fn consume(
        &self,
        client: &Client,
        answer: &str,
        attempt: &Attempt,
    ) -> Result<Self::Output, AnswerError> {
        (**self).consume(client, answer, attempt).await
    }
}

/// Captcha source that GETs a fixed URL
#[derive(Debug, Clone)]
pub struct UrlCaptchaSource {
    url: String,
}

impl UrlCaptchaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CaptchaSource for UrlCaptchaSource {
    async fn fetch(&self, client: &Client, attempt: &Attempt) -> anyhow::Result<Bytes> {
        debug!("Fetching captcha {} from {}", attempt, self.url);
        let response = client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("captcha endpoint returned {}", status);
        }
        Ok(response.bytes().await?)
    }
}
