//! Gesture classifier
//!
//! Maps landmark frames to fingerspelled letters through an ordered,
//! hand-tuned rule table (see [`rules`]). Only a subset of the alphabet is
//! covered; anything else comes back as [`Label::NoGestureMatched`], which
//! is an ordinary result and not an error.

pub mod rules;

use serde::Serialize;

pub use rules::{HandView, Partition, Rule, RuleStatus, RuleTable};

use crate::config::RecognizerConfig;
use crate::features::FeatureSet;
use crate::geometry::NEAR_THRESHOLD;
use crate::landmarks::{LandmarkFrame, Observation};

/// Letters the rule table can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    K,
    L,
    M,
    N,
    R,
    S,
}

impl Letter {
    pub fn as_char(&self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::H => 'H',
            Letter::I => 'I',
            Letter::K => 'K',
            Letter::L => 'L',
            Letter::M => 'M',
            Letter::N => 'N',
            Letter::R => 'R',
            Letter::S => 'S',
        }
    }
}

/// Classifier output for one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Letter(Letter),
    /// The observation carried no usable hand
    NoHandDetected,
    /// A hand was seen but no rule matched it
    NoGestureMatched,
}

impl Label {
    /// Sentinels are shown to the user but never transcribed
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Label::Letter(_))
    }

    pub fn letter(&self) -> Option<Letter> {
        match self {
            Label::Letter(letter) => Some(*letter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Letter(letter) => write!(f, "{}", letter.as_char()),
            Label::NoHandDetected => write!(f, "No hand detected"),
            Label::NoGestureMatched => write!(f, "no gesture"),
        }
    }
}

impl From<Letter> for Label {
    fn from(letter: Letter) -> Self {
        Label::Letter(letter)
    }
}

/// Rule-based letter classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RuleTable,
    near_threshold: f32,
    skip_flagged_rules: bool,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            table: RuleTable::standard(),
            near_threshold: NEAR_THRESHOLD,
            skip_flagged_rules: false,
        }
    }

    pub fn from_config(config: &RecognizerConfig) -> Self {
        Self {
            table: RuleTable::standard(),
            near_threshold: config.near_threshold,
            skip_flagged_rules: config.skip_flagged_rules,
        }
    }

    /// The rule table, for inspection
    pub fn rules(&self) -> &RuleTable {
        &self.table
    }

    /// Classify one hand from its already-extracted features.
    pub fn classify_features(&self, features: &FeatureSet, frame: &LandmarkFrame) -> Label {
        let view = HandView {
            features,
            frame,
            near_threshold: self.near_threshold,
        };

        match self.table.evaluate(&view, self.skip_flagged_rules) {
            Some(rule) => Label::Letter(rule.letter),
            None => Label::NoGestureMatched,
        }
    }

    /// Classify a single hand.
    pub fn classify_frame(&self, frame: &LandmarkFrame) -> Label {
        let features = FeatureSet::extract(frame);
        let label = self.classify_features(&features, frame);
        log::trace!("{:?} -> {}", features, label);
        label
    }

    /// Classify every hand of an observation in order and keep the first
    /// letter. Malformed hands are dropped as if they were never detected.
    pub fn classify(&self, observation: &Observation) -> Label {
        if observation.is_empty() {
            return Label::NoHandDetected;
        }

        first_letter(observation.frames().map(|frame| match frame {
            Ok(frame) => self.classify_frame(&frame),
            Err(e) => {
                log::warn!("Rejecting hand at t={}ms: {}", observation.timestamp_ms, e);
                Label::NoHandDetected
            }
        }))
    }

    /// Same as [`classify`](Self::classify) for hands that are already validated.
    pub fn classify_frames(&self, frames: &[LandmarkFrame]) -> Label {
        first_letter(frames.iter().map(|frame| self.classify_frame(frame)))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce per-hand labels (in hand order) to one label for the observation.
///
/// The first letter wins and stops the iteration. Without a letter, any
/// valid hand makes the result `NoGestureMatched`; no valid hand at all
/// gives `NoHandDetected`.
pub fn first_letter(per_hand: impl IntoIterator<Item = Label>) -> Label {
    let mut result = Label::NoHandDetected;
    for label in per_hand {
        match label {
            Label::Letter(_) => return label,
            Label::NoGestureMatched => result = Label::NoGestureMatched,
            Label::NoHandDetected => {}
        }
    }
    result
}
