// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for session retry, termination and reporting

use super::support::*;
use captcha_engine::engine::{CaptchaEngine, CollectingReporter};
use captcha_engine::session::{CaptchaSession, SessionConfig, SessionError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn config(retry_count: u32) -> SessionConfig {
    SessionConfig {
        retry_count,
        attempt_timeout_ms: 2_000,
        ..SessionConfig::default()
    }
}

#[tokio::test]
async fn test_always_rejected_exhausts_retries() {
    let reporter = Arc::new(CollectingReporter::new());
    let source = Arc::new(StubSource::default());
    let consumer = ScriptedConsumer::always(Verdict::Reject);

    let session = CaptchaSession::new(
        source.clone(),
        consumer.clone(),
        engine_with_reporter(reporter.clone()),
    )
    .with_config(config(3));

    let err = session.start(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::RetryLimitExceeded { attempts: 4 }));
    assert_eq!(source.count(), 4);
    assert_eq!(consumer.count(), 4);

    let records = reporter.records().await;
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| !r.accepted && r.answer == "aaaaa"));
    assert_eq!(
        records.iter().map(|r| r.attempt_number).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_zero_retries_means_single_attempt() {
    let source = Arc::new(StubSource::default());
    let session = CaptchaSession::new(
        source.clone(),
        ScriptedConsumer::always(Verdict::Reject),
        engine_with_reporter(Arc::new(CollectingReporter::new())),
    )
    .with_config(config(0));

    let err = session.start(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::RetryLimitExceeded { attempts: 1 }));
    assert_eq!(source.count(), 1);
}

#[tokio::test]
async fn test_hard_error_stops_immediately() {
    let reporter = Arc::new(CollectingReporter::new());
    let source = Arc::new(StubSource::default());
    let consumer = ScriptedConsumer::new(vec![Verdict::Reject, Verdict::Fail, Verdict::Accept]);

    let session = CaptchaSession::new(
        source.clone(),
        consumer.clone(),
        engine_with_reporter(reporter.clone()),
    )
    .with_config(config(4));

    let err = session.start(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::Consumer(_)));
    assert!(err.to_string().contains("upstream returned 500"));
    assert_eq!(source.count(), 2);

    // Only the rejection is reported; the hard failure is not an outcome.
    let records = reporter.records().await;
    assert_eq!(records.len(), 1);
    assert!(!records[0].accepted);
}

#[tokio::test]
async fn test_success_after_rejection_reports_both() {
    let reporter = Arc::new(CollectingReporter::new());
    let session = CaptchaSession::new(
        Arc::new(StubSource::default()),
        ScriptedConsumer::new(vec![Verdict::Reject, Verdict::Accept]),
        engine_with_reporter(reporter.clone()),
    )
    .with_config(config(5));

    let output = session.start(&CancellationToken::new()).await.unwrap();
    assert_eq!(output, 2);

    let records = reporter.records().await;
    assert_eq!(records.len(), 2);
    assert!(!records[0].accepted);
    assert!(records[1].accepted);
    assert_eq!(reporter.accuracy().await, Some(0.5));
}

#[tokio::test]
async fn test_reporter_failure_does_not_change_outcome() {
    let engine = Arc::new(
        CaptchaEngine::builder(Arc::new(ConstantClassifier))
            .reporter(Arc::new(FailingReporter))
            .build()
            .unwrap(),
    );
    let session = CaptchaSession::new(
        Arc::new(StubSource::default()),
        ScriptedConsumer::new(vec![Verdict::Reject, Verdict::Accept]),
        engine,
    )
    .with_config(config(2));

    assert_eq!(session.start(&CancellationToken::new()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_session_without_reporter() {
    let engine = Arc::new(
        CaptchaEngine::builder(Arc::new(ConstantClassifier))
            .build()
            .unwrap(),
    );
    let session = CaptchaSession::new(
        Arc::new(StubSource::default()),
        ScriptedConsumer::always(Verdict::Accept),
        engine,
    );
    assert_eq!(session.start(&CancellationToken::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_attempt_ids_reach_consumer_and_reporter() {
    let reporter = Arc::new(CollectingReporter::new());
    let consumer = ScriptedConsumer::new(vec![Verdict::Reject, Verdict::Accept]);
    let counter = Arc::new(AtomicU32::new(0));
    let ids = counter.clone();

    let session = CaptchaSession::new(
        Arc::new(StubSource::default()),
        consumer.clone(),
        engine_with_reporter(reporter.clone()),
    )
    .with_config(config(3))
    .with_id_generator(Arc::new(move || {
        format!("sess-{}", ids.fetch_add(1, Ordering::SeqCst))
    }));

    session.start(&CancellationToken::new()).await.unwrap();

    let seen = consumer.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "aaaaa");
    assert_eq!(seen[0].1.id.as_deref(), Some("sess-0"));
    assert_eq!(seen[1].1.id.as_deref(), Some("sess-1"));

    let records = reporter.records().await;
    assert_eq!(records[0].attempt_id.as_deref(), Some("sess-0"));
    assert_eq!(records[1].attempt_id.as_deref(), Some("sess-1"));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_undecodable_captcha_is_terminal_and_unreported() {
    struct GarbageSource;

    #[async_trait::async_trait]
    impl captcha_engine::session::CaptchaSource for GarbageSource {
        async fn fetch(
            &self,
            _client: &reqwest::Client,
            _attempt: &captcha_engine::engine::Attempt,
        ) -> anyhow::Result<bytes::Bytes> {
            Ok(bytes::Bytes::from_static(b"<html>maintenance</html>"))
        }
    }

    let reporter = Arc::new(CollectingReporter::new());
    let consumer = ScriptedConsumer::always(Verdict::Accept);
    let session = CaptchaSession::new(
        GarbageSource,
        consumer.clone(),
        engine_with_reporter(reporter.clone()),
    );

    let err = session.start(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::Decode(_)));
    assert_eq!(consumer.count(), 0);
    assert!(reporter.records().await.is_empty());
}

#[tokio::test]
async fn test_invalid_config_fails_before_fetching() {
    let source = Arc::new(StubSource::default());
    let session = CaptchaSession::new(
        source.clone(),
        ScriptedConsumer::always(Verdict::Accept),
        engine_with_reporter(Arc::new(CollectingReporter::new())),
    )
    .with_config(SessionConfig {
        attempt_timeout_ms: 0,
        ..SessionConfig::default()
    });

    let err = session.start(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidConfig(_)));
    assert_eq!(source.count(), 0);
}
