// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Outcome reporting

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::types::{Attempt, CaptchaAnswer, ReportRecord};

/// Receives accept/reject feedback for submitted answers
///
/// Errors are logged by the caller and never change a session's result.
#[async_trait]
pub trait OutcomeReporter: Send + Sync {
    async fn report(
        &self,
        answer: &CaptchaAnswer,
        accepted: bool,
        attempt: &Attempt,
    ) -> anyhow::Result<()>;
}

/// Reporter that only logs outcomes
#[derive(Debug, Default)]
pub struct TracingReporter;

#[async_trait]
impl OutcomeReporter for TracingReporter {
    async fn report(
        &self,
        answer: &CaptchaAnswer,
        accepted: bool,
        attempt: &Attempt,
    ) -> anyhow::Result<()> {
        info!(
            "Captcha outcome: answer={} accepted={} attempt={}",
            answer, accepted, attempt
        );
        Ok(())
    }
}

/// Reporter that keeps every record in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    records: Mutex<Vec<ReportRecord>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far
    pub async fn records(&self) -> Vec<ReportRecord> {
        self.records.lock().await.clone()
    }

    /// Ratio of accepted answers, `None` before the first report
    pub async fn accuracy(&self) -> Option<f64> {
        let records = self.records.lock().await;
        if records.is_empty() {
            return None;
        }
        let accepted = records.iter().filter(|r| r.accepted).count();
        Some(accepted as f64 / records.len() as f64)
    }
}

#[async_trait]
impl OutcomeReporter for CollectingReporter {
    async fn report(
        &self,
        answer: &CaptchaAnswer,
        accepted: bool,
        attempt: &Attempt,
    ) -> anyhow::Result<()> {
        self.records.lock().await.push(ReportRecord {
            answer: answer.as_str().to_string(),
            accepted,
            attempt_number: attempt.number,
            attempt_id: attempt.id.clone(),
        });
        Ok(())
    }
}
