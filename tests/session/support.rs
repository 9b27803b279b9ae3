// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared stub collaborators for session tests

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use captcha_engine::classifier::{ClassifierError, SymbolClassifier};
use captcha_engine::engine::{
    Attempt, CaptchaAnswer, CaptchaEngine, CollectingReporter, OutcomeReporter,
};
use captcha_engine::image_utils::encode_png;
use captcha_engine::session::{AnswerConsumer, AnswerError, CaptchaSource};
use image::RgbaImage;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Classifier that labels every crop "a"
pub struct ConstantClassifier;

#[async_trait]
impl SymbolClassifier for ConstantClassifier {
    async fn resolve(&self, _image: &RgbaImage) -> Result<String, ClassifierError> {
        Ok("a".to_string())
    }
}

pub fn captcha_png() -> Bytes {
    Bytes::from(encode_png(&RgbaImage::new(200, 60)).unwrap_or_default())
}

pub fn engine_with_reporter(reporter: Arc<CollectingReporter>) -> Arc<CaptchaEngine> {
    Arc::new(
        CaptchaEngine::builder(Arc::new(ConstantClassifier))
            .reporter(reporter)
            .build()
            .unwrap(),
    )
}

/// Serves the same PNG on every fetch and counts fetches
#[derive(Default)]
pub struct StubSource {
    pub fetches: AtomicUsize,
    pub delay: Option<Duration>,
}

impl StubSource {
    pub fn slow(delay: Duration) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptchaSource for StubSource {
    async fn fetch(&self, _client: &Client, _attempt: &Attempt) -> anyhow::Result<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(captcha_png())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Accept,
    Reject,
    Fail,
    Hang,
}

/// Answers each submission from a script; the last verdict repeats
pub struct ScriptedConsumer {
    script: Vec<Verdict>,
    calls: AtomicUsize,
    pub seen: Mutex<Vec<(String, Attempt)>>,
}

impl ScriptedConsumer {
    pub fn new(script: Vec<Verdict>) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn always(verdict: Verdict) -> Arc<Self> {
        Self::new(vec![verdict])
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerConsumer for ScriptedConsumer {
    type Output = u32;

    async fn consume(
        &self,
        _client: &Client,
        answer: &str,
        attempt: &Attempt,
    ) -> Result<u32, AnswerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((answer.to_string(), attempt.clone()));
        }

        let verdict = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(Verdict::Fail);
        match verdict {
            Verdict::Accept => Ok(attempt.number),
            Verdict::Reject => Err(AnswerError::Rejected),
            Verdict::Fail => Err(anyhow!("upstream returned 500").into()),
            Verdict::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(attempt.number)
            }
        }
    }
}

/// Reporter that always fails
pub struct FailingReporter;

#[async_trait]
impl OutcomeReporter for FailingReporter {
    async fn report(
        &self,
        _answer: &CaptchaAnswer,
        _accepted: bool,
        _attempt: &Attempt,
    ) -> anyhow::Result<()> {
        Err(anyhow!("feedback store unavailable"))
    }
}
