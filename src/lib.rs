// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classifier;
pub mod cli;
pub mod engine;
pub mod fisheye;
pub mod image_utils;
pub mod segment;
pub mod session;
pub mod version;

// Re-export main types
pub use classifier::{ClassifierError, Labels, RemoteClassifier, SymbolClassifier};
pub use engine::{
    Attempt, CaptchaAnswer, CaptchaEngine, EngineConfig, EngineError, OutcomeReporter,
    Preprocessor,
};
pub use fisheye::{find_correction, Correction, FisheyeError, FisheyePreprocessor};
pub use segment::{segment, SegmentError};
pub use session::{
    AnswerConsumer, AnswerError, CaptchaSession, CaptchaSource, SessionConfig, SessionError,
};
