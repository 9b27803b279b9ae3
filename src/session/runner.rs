// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch, resolve, submit and retry

use reqwest::{Client, Proxy};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use super::config::SessionConfig;
use super::errors::{AnswerError, SessionError};
use super::id::IdGenerator;
use super::source::{AnswerConsumer, CaptchaSource};
use crate::engine::{Attempt, CaptchaAnswer, CaptchaEngine};
use crate::image_utils::decode_image_bytes;

enum AttemptOutcome<T> {
    Accepted(T),
    Rejected,
}

/// Drives one logical captcha session
///
/// Each call to [`CaptchaSession::start`] owns its own HTTP client and cookie
/// store, so independent sessions can run concurrently on separate tasks.
pub struct CaptchaSession<S, C> {
    source: S,
    consumer: C,
    engine: Arc<CaptchaEngine>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    config: SessionConfig,
}

impl<S, C> CaptchaSession<S, C>
where
    S: CaptchaSource,
    C: AnswerConsumer,
{
    pub fn new(source: S, consumer: C, engine: Arc<CaptchaEngine>) -> Self {
        Self {
            source,
            consumer,
            engine,
            id_generator: None,
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a per-attempt id to every attempt
    pub fn with_id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn build_client(&self) -> Result<Client, SessionError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .timeout(self.config.attempt_timeout());

        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if let Some(proxy) = &self.config.proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(builder.build()?)
    }

    /// Run attempts until one is accepted
    ///
    /// Only [`AnswerError::Rejected`] leads to another attempt. Every other
    /// failure, including cancellation, ends the session immediately.
    pub async fn start(&self, cancel: &CancellationToken) -> Result<C::Output, SessionError> {
        self.config.validate().map_err(SessionError::InvalidConfig)?;
        let client = self.build_client()?;
        let attempts = self.config.attempts();

        for number in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }

            let attempt = Attempt::new(number, self.id_generator.as_ref().map(|g| g.new_id()));
            let span = info_span!(
                "captcha_attempt",
                attempt = number,
                id = attempt.id.as_deref().unwrap_or("-")
            );

            match self
                .run_attempt(&client, &attempt, cancel)
                .instrument(span)
                .await?
            {
                AttemptOutcome::Accepted(output) => {
                    info!("Captcha accepted on attempt {}/{}", number, attempts);
                    return Ok(output);
                }
                AttemptOutcome::Rejected => {
                    info!("Captcha rejected on attempt {}/{}", number, attempts);
                }
            }
        }

        warn!("Captcha session exhausted {} attempts", attempts);
        Err(SessionError::RetryLimitExceeded { attempts })
    }

    async fn run_attempt(
        &self,
        client: &Client,
        attempt: &Attempt,
        cancel: &CancellationToken,
    ) -> Result<AttemptOutcome<C::Output>, SessionError> {
        let bytes = self
            .guard("fetch", cancel, self.source.fetch(client, attempt))
            .await?
            .map_err(SessionError::Transport)?;

        let (image, info) = decode_image_bytes(&bytes)?;
        debug!("Fetched captcha {}x{} ({} bytes)", info.width, info.height, info.size_bytes);

        let answer = self
            .guard("resolve", cancel, self.engine.resolve_image(&image))
            .await??;
        debug!("Submitting answer {}", answer);

        let submitted = self
            .guard(
                "submit",
                cancel,
                self.consumer.consume(client, answer.as_str(), attempt),
            )
            .await?;

        match submitted {
            Ok(output) => {
                self.report(&answer, true, attempt).await;
                Ok(AttemptOutcome::Accepted(output))
            }
            Err(AnswerError::Rejected) => {
                self.report(&answer, false, attempt).await;
                Ok(AttemptOutcome::Rejected)
            }
            Err(AnswerError::Other(e)) => Err(SessionError::Consumer(e)),
        }
    }

    /// Run one step under the attempt timeout, aborting on cancellation
    async fn guard<F>(
        &self,
        stage: &'static str,
        cancel: &CancellationToken,
        step: F,
    ) -> Result<F::Output, SessionError>
    where
        F: Future,
    {
        let timeout = self.config.attempt_timeout();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SessionError::Cancelled),
            result = tokio::time::timeout(timeout, step) => result.map_err(|_| SessionError::Timeout {
                stage,
                timeout_ms: self.config.attempt_timeout_ms,
            }),
        }
    }

    /// Best-effort outcome report; failures are logged and dropped
    async fn report(&self, answer: &CaptchaAnswer, accepted: bool, attempt: &Attempt) {
        let Some(reporter) = self.engine.reporter() else {
            return;
        };

        match tokio::time::timeout(
            self.config.attempt_timeout(),
            reporter.report(answer, accepted, attempt),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to report captcha outcome: {}", e),
            Err(_) => warn!("Reporting captcha outcome timed out"),
        }
    }
}
