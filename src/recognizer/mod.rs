//! Recognition pipeline
//!
//! observation -> features -> classifier -> label -> transcript.
//! [`Recognizer`] runs the pipeline synchronously on the caller's thread;
//! [`RecognizerWorker`] runs it on a background thread fed from a tracker
//! callback.

mod worker;

use std::time::Duration;

use serde::Serialize;

pub use worker::{RecognizerSnapshot, RecognizerWorker};

use crate::classifier::{Classifier, Label};
use crate::config::RecognizerConfig;
use crate::landmarks::Observation;
use crate::transcript::{AppendOutcome, TranscriptAccumulator};

/// What happened to one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recognition {
    pub label: Label,
    pub outcome: AppendOutcome,
}

/// Single-threaded recognition pipeline
#[derive(Debug, Clone)]
pub struct Recognizer {
    classifier: Classifier,
    accumulator: TranscriptAccumulator,
    last_label: Label,
}

impl Recognizer {
    pub fn new(config: &RecognizerConfig) -> Self {
        Self {
            classifier: Classifier::from_config(config),
            accumulator: TranscriptAccumulator::new(config.cooldown()),
            last_label: Label::NoHandDetected,
        }
    }

    /// Classify one observation and feed the label to the transcript.
    pub fn process(&mut self, observation: &Observation) -> Recognition {
        log::trace!(
            "[TS:{}] {}",
            observation.timestamp_ms,
            observation.debug_summary()
        );

        let label = self.classifier.classify(observation);
        let at = Duration::from_millis(observation.timestamp_ms);
        let outcome = self.accumulator.offer(&label, at);

        if label != self.last_label {
            log::debug!("t={}ms label {}", observation.timestamp_ms, label);
        }
        self.last_label = label;

        Recognition { label, outcome }
    }

    /// Label of the most recent observation, for transient display
    pub fn last_label(&self) -> Label {
        self.last_label
    }

    pub fn text(&self) -> &str {
        self.accumulator.text()
    }

    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    pub fn commit(&mut self) -> String {
        self.accumulator.commit()
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(&RecognizerConfig::default())
    }
}
