//! Feature extraction
//!
//! Derives coarse categorical predicates (handedness, per-finger state,
//! thumb state, palm tilt) from one landmark frame. The classifier rules
//! are written against these, plus a few raw coordinate comparisons the
//! predicates cannot express.

use serde::Serialize;

use crate::geometry::distance;
use crate::landmarks::{
    LandmarkFrame, INDEX_FINGER_DIP, INDEX_FINGER_MCP, INDEX_FINGER_PIP, INDEX_FINGER_TIP,
    MIDDLE_FINGER_DIP, MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP, MIDDLE_FINGER_TIP, PINKY_DIP,
    PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_FINGER_DIP, RING_FINGER_MCP, RING_FINGER_PIP,
    RING_FINGER_TIP, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

/// Which hand is presented to the camera.
///
/// Decided by comparing the thumb base (landmark 2) with the pinky base
/// (landmark 17) along x. This assumes a frontal, unmirrored view with the
/// palm facing the camera; a rotated or mirrored hand is misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Handedness {
    Left,
    Right,
    Unknown,
}

/// The four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Joint indices from knuckle (MCP) to tip
    pub fn joints(&self) -> [usize; 4] {
        match self {
            Finger::Index => [INDEX_FINGER_MCP, INDEX_FINGER_PIP, INDEX_FINGER_DIP, INDEX_FINGER_TIP],
            Finger::Middle => [
                MIDDLE_FINGER_MCP,
                MIDDLE_FINGER_PIP,
                MIDDLE_FINGER_DIP,
                MIDDLE_FINGER_TIP,
            ],
            Finger::Ring => [RING_FINGER_MCP, RING_FINGER_PIP, RING_FINGER_DIP, RING_FINGER_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    fn slot(&self) -> usize {
        match self {
            Finger::Index => 0,
            Finger::Middle => 1,
            Finger::Ring => 2,
            Finger::Pinky => 3,
        }
    }
}

/// Pose of a single finger.
///
/// `StraightUp` and `StraightDown` are not complements: a finger that is
/// neither vertical nor folded back is `Indeterminate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FingerState {
    /// Joints strictly rise from knuckle to tip
    StraightUp,
    /// Tip is closer to the wrist than the knuckle is (folded into the palm)
    StraightDown,
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ThumbState {
    Open,
    Bent,
}

/// Tilt of the palm, read from wrist, thumb base and pinky base heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PalmOrientation {
    Vertical,
    Inclined,
    Other,
}

/// Predicates derived from one frame. Recomputed for every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureSet {
    pub handedness: Handedness,
    /// Index, middle, ring, pinky
    pub fingers: [FingerState; 4],
    pub thumb: ThumbState,
    pub palm: PalmOrientation,
}

impl FeatureSet {
    /// Extract every predicate from a frame. Total over well-formed frames.
    pub fn extract(frame: &LandmarkFrame) -> Self {
        Self {
            handedness: handedness(frame),
            fingers: Finger::ALL.map(|finger| finger_state(frame, finger)),
            thumb: thumb_state(frame),
            palm: palm_orientation(frame),
        }
    }

    pub fn finger(&self, finger: Finger) -> FingerState {
        self.fingers[finger.slot()]
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.finger(finger) == FingerState::StraightUp
    }

    pub fn is_down(&self, finger: Finger) -> bool {
        self.finger(finger) == FingerState::StraightDown
    }

    /// Compare all four fingers at once, index first
    pub fn fingers_are(&self, states: [FingerState; 4]) -> bool {
        self.fingers == states
    }
}

fn handedness(frame: &LandmarkFrame) -> Handedness {
    let thumb_base = frame.get(THUMB_MCP).x;
    let pinky_base = frame.get(PINKY_MCP).x;

    if thumb_base > pinky_base {
        Handedness::Left
    } else if thumb_base < pinky_base {
        Handedness::Right
    } else {
        Handedness::Unknown
    }
}

fn finger_state(frame: &LandmarkFrame, finger: Finger) -> FingerState {
    let [mcp, pip, dip, tip] = finger.joints().map(|i| frame.get(i));

    if tip.y < dip.y && dip.y < pip.y && pip.y < mcp.y {
        return FingerState::StraightUp;
    }

    let wrist = frame.get(WRIST);
    if distance(tip, wrist) < distance(mcp, wrist) {
        FingerState::StraightDown
    } else {
        FingerState::Indeterminate
    }
}

fn thumb_state(frame: &LandmarkFrame) -> ThumbState {
    let tip = frame.get(THUMB_TIP);
    let ip = frame.get(THUMB_IP);

    let tucked = distance(tip, frame.get(MIDDLE_FINGER_MCP)) <= distance(tip, frame.get(THUMB_MCP));
    if tucked && tip.y >= ip.y {
        ThumbState::Bent
    } else {
        ThumbState::Open
    }
}

fn palm_orientation(frame: &LandmarkFrame) -> PalmOrientation {
    let wrist = frame.get(WRIST).y;
    let thumb_base = frame.get(THUMB_MCP).y;
    let pinky_base = frame.get(PINKY_MCP).y;

    if wrist > thumb_base && thumb_base > pinky_base {
        PalmOrientation::Vertical
    } else if wrist > pinky_base && pinky_base >= thumb_base {
        PalmOrientation::Inclined
    } else {
        PalmOrientation::Other
    }
}
