//! Hand landmark data model
//!
//! One tracked hand is 21 points in MediaPipe order. Coordinates are
//! normalized to the camera frame (x right, y down, both roughly 0..1) with
//! z as relative depth. Index is identity: landmark 8 is always the index
//! fingertip.

use std::fmt::Write;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{FingerspellError, Result};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_FINGER_MCP: usize = 5;
pub const INDEX_FINGER_PIP: usize = 6;
pub const INDEX_FINGER_DIP: usize = 7;
pub const INDEX_FINGER_TIP: usize = 8;
pub const MIDDLE_FINGER_MCP: usize = 9;
pub const MIDDLE_FINGER_PIP: usize = 10;
pub const MIDDLE_FINGER_DIP: usize = 11;
pub const MIDDLE_FINGER_TIP: usize = 12;
pub const RING_FINGER_MCP: usize = 13;
pub const RING_FINGER_PIP: usize = 14;
pub const RING_FINGER_DIP: usize = 15;
pub const RING_FINGER_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single tracked point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Image-plane projection (depth dropped)
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Exactly 21 landmarks for one hand at one capture instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build a frame from tracker output, rejecting anything but 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self> {
        let points: [Landmark; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| FingerspellError::MalformedFrame {
                    expected: LANDMARK_COUNT,
                    actual: points.len(),
                })?;
        Ok(Self { points })
    }

    /// Landmark by anatomical index (see the `*_MCP`/`*_TIP` constants).
    ///
    /// Panics if `index >= 21`; all call sites use the named constants.
    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = FingerspellError;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        Self::from_slice(&points)
    }
}

impl From<LandmarkFrame> for Vec<Landmark> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points.to_vec()
    }
}

/// One tracker packet: every hand seen in a single video frame.
///
/// Hands are kept as raw point lists so that one malformed hand does not
/// reject the rest of the packet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Capture time in milliseconds since the start of the session
    #[serde(default)]
    pub timestamp_ms: u64,
    /// Detected hands in tracker order (0-2 typically)
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

impl Observation {
    pub fn new(timestamp_ms: u64, hands: Vec<Vec<Landmark>>) -> Self {
        Self { timestamp_ms, hands }
    }

    /// Observation built from already-validated frames
    pub fn from_frames(timestamp_ms: u64, frames: &[LandmarkFrame]) -> Self {
        Self {
            timestamp_ms,
            hands: frames.iter().map(|f| f.points.to_vec()).collect(),
        }
    }

    /// Validate each hand in input order.
    pub fn frames(&self) -> impl Iterator<Item = Result<LandmarkFrame>> + '_ {
        self.hands.iter().map(|hand| LandmarkFrame::from_slice(hand))
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Readable dump of every hand's points, for trace logging
    pub fn debug_summary(&self) -> String {
        if self.is_empty() {
            return "No hand landmarks".to_string();
        }

        let mut out = format!("Number of hands detected: {}\n", self.hands.len());
        for (hand_index, hand) in self.hands.iter().enumerate() {
            let _ = writeln!(
                out,
                "\t#Hand landmarks for hand[{}]: {}",
                hand_index,
                hand.len()
            );
            for (i, lm) in hand.iter().enumerate() {
                let _ = writeln!(out, "\t\tLandmark [{}]: ({}, {}, {})", i, lm.x, lm.y, lm.z);
            }
        }
        out
    }
}
