//! Transcript accumulation
//!
//! Turns a stream of per-frame labels into text. A held pose is classified
//! on every video frame, so appends are debounced: after a letter is
//! written, nothing else is written until the cool-down has elapsed since
//! that append. The window is measured on capture timestamps, not frame
//! count, so the result does not depend on the tracker's frame rate.

use std::time::Duration;

use serde::Serialize;

use crate::classifier::Label;

/// Accumulated text and the time of the last accepted append
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    /// Capture time of the last append; `None` until the first one
    pub last_append: Option<Duration>,
}

/// Result of offering one label to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AppendOutcome {
    Appended,
    /// Suppressed; the cool-down ends after `remaining`
    CoolingDown { remaining: Duration },
    /// Sentinel label, never transcribed
    Ignored,
}

/// Debounced transcript builder
#[derive(Debug, Clone)]
pub struct TranscriptAccumulator {
    transcript: Transcript,
    cooldown: Duration,
}

impl TranscriptAccumulator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            transcript: Transcript::default(),
            cooldown,
        }
    }

    /// Offer a label captured at `at` (time since session start).
    pub fn offer(&mut self, label: &Label, at: Duration) -> AppendOutcome {
        let Label::Letter(letter) = label else {
            return AppendOutcome::Ignored;
        };

        if let Some(last) = self.transcript.last_append {
            // A timestamp older than the last append saturates to zero
            // elapsed time and stays suppressed.
            let elapsed = at.saturating_sub(last);
            if elapsed < self.cooldown {
                return AppendOutcome::CoolingDown {
                    remaining: self.cooldown - elapsed,
                };
            }
        }

        self.transcript.text.push(letter.as_char());
        self.transcript.last_append = Some(at);
        log::debug!("Appended '{}' -> \"{}\"", letter.as_char(), self.transcript.text);
        AppendOutcome::Appended
    }

    /// Clear the text and the cool-down; the next letter appends immediately.
    pub fn reset(&mut self) {
        self.transcript = Transcript::default();
    }

    /// Hand the finished text to the caller and start over.
    pub fn commit(&mut self) -> String {
        let text = std::mem::take(&mut self.transcript.text);
        self.reset();
        text
    }

    pub fn text(&self) -> &str {
        &self.transcript.text
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

impl Default for TranscriptAccumulator {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}
