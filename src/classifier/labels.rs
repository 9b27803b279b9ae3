// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label table for classifier output indices

use std::fs;
use std::path::Path;

use super::ClassifierError;

/// Ordered labels, index `i` naming output `i` of the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// Read one label per line
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self(contents.lines().map(str::to_string).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label with the highest probability (first one wins ties)
    pub fn best_match(&self, probabilities: &[f32]) -> Result<String, ClassifierError> {
        if self.0.len() != probabilities.len() || probabilities.is_empty() {
            return Err(ClassifierError::LabelMismatch {
                labels: self.0.len(),
                probabilities: probabilities.len(),
            });
        }

        let mut best = 0;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = i;
            }
        }
        Ok(self.0[best].clone())
    }
}

impl From<Vec<&str>> for Labels {
    fn from(labels: Vec<&str>) -> Self {
        Self(labels.into_iter().map(str::to_string).collect())
    }
}
