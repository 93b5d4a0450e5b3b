//! Fingerspell - fingerspelling recognition from hand landmarks
//!
//! Consumes the 21-point hand landmarks produced by a MediaPipe-style hand
//! tracker, classifies each pose into a letter with a geometric rule table,
//! and accumulates recognized letters into a debounced transcript.

pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod geometry;
pub mod landmarks;
pub mod recognizer;
pub mod transcript;

pub use classifier::{Classifier, Label, Letter};
pub use config::RecognizerConfig;
pub use error::{FingerspellError, Result};
pub use features::FeatureSet;
pub use landmarks::{Landmark, LandmarkFrame, Observation};
pub use recognizer::{Recognition, Recognizer, RecognizerSnapshot, RecognizerWorker};
pub use transcript::{AppendOutcome, Transcript, TranscriptAccumulator};
