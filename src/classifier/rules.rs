//! Letter rule tables
//!
//! Rules are grouped by handedness and palm orientation. Within a
//! partition they are tried in order and the first match wins, so order is
//! part of each rule's meaning: later rules may overlap earlier ones.
//!
//! Left-hand partitions are empty. The geometry is not
//! mirror-symmetric (see [`Handedness`]), so right-hand rules are not
//! reflected onto the left hand.

use serde::Serialize;

use super::Letter;
use crate::features::{FeatureSet, Finger, FingerState, Handedness, PalmOrientation, ThumbState};
use crate::geometry;
use crate::landmarks::*;

/// Confidence in a rule, as left by whoever tuned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleStatus {
    Stable,
    /// Fires, but confuses neighbouring letters
    NeedsCorrection,
    /// Rarely or never fires on real input
    Unreliable,
}

/// Everything a rule may look at for one hand
pub struct HandView<'a> {
    pub features: &'a FeatureSet,
    pub frame: &'a LandmarkFrame,
    pub near_threshold: f32,
}

impl<'a> HandView<'a> {
    pub fn x(&self, index: usize) -> f32 {
        self.frame.get(index).x
    }

    pub fn y(&self, index: usize) -> f32 {
        self.frame.get(index).y
    }

    pub fn distance(&self, a: usize, b: usize) -> f32 {
        geometry::distance(self.frame.get(a), self.frame.get(b))
    }

    pub fn near(&self, a: usize, b: usize) -> bool {
        geometry::near(self.frame.get(a), self.frame.get(b), self.near_threshold)
    }

    fn thumb_open(&self) -> bool {
        self.features.thumb == ThumbState::Open
    }

    fn thumb_bent(&self) -> bool {
        self.features.thumb == ThumbState::Bent
    }

    fn up(&self, finger: Finger) -> bool {
        self.features.is_up(finger)
    }

    fn down(&self, finger: Finger) -> bool {
        self.features.is_down(finger)
    }

    fn all(&self, state: FingerState) -> bool {
        self.features.fingers_are([state; 4])
    }
}

pub type Predicate = fn(&HandView<'_>) -> bool;

/// One conjunction of conditions mapped to a letter
#[derive(Clone, Copy)]
pub struct Rule {
    pub letter: Letter,
    pub status: RuleStatus,
    predicate: Predicate,
}

impl Rule {
    pub const fn new(letter: Letter, status: RuleStatus, predicate: Predicate) -> Self {
        Self {
            letter,
            status,
            predicate,
        }
    }

    pub fn matches(&self, view: &HandView<'_>) -> bool {
        (self.predicate)(view)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("letter", &self.letter)
            .field("status", &self.status)
            .finish()
    }
}

/// Ordered rules for one (handedness, palm orientation) pair
#[derive(Debug, Clone)]
pub struct Partition {
    pub handedness: Handedness,
    pub palm: PalmOrientation,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    partitions: Vec<Partition>,
}

impl RuleTable {
    /// The fingerspelling table. Only the letters listed here resolve;
    /// everything else reports no match.
    pub fn standard() -> Self {
        use Handedness::{Left, Right};
        use PalmOrientation::{Inclined, Other, Vertical};

        Self {
            partitions: vec![
                Partition {
                    handedness: Right,
                    palm: Vertical,
                    rules: right_vertical(),
                },
                Partition {
                    handedness: Right,
                    palm: Inclined,
                    rules: right_inclined(),
                },
                Partition {
                    handedness: Right,
                    palm: Other,
                    rules: right_other(),
                },
                Partition {
                    handedness: Left,
                    palm: Vertical,
                    rules: Vec::new(),
                },
                Partition {
                    handedness: Left,
                    palm: Inclined,
                    rules: Vec::new(),
                },
                Partition {
                    handedness: Left,
                    palm: Other,
                    rules: Vec::new(),
                },
            ],
        }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn partition(&self, handedness: Handedness, palm: PalmOrientation) -> Option<&Partition> {
        self.partitions
            .iter()
            .find(|p| p.handedness == handedness && p.palm == palm)
    }

    /// First matching rule for this hand. `skip_flagged` ignores every
    /// rule not marked [`RuleStatus::Stable`].
    pub fn evaluate(&self, view: &HandView<'_>, skip_flagged: bool) -> Option<&Rule> {
        let partition = self.partition(view.features.handedness, view.features.palm)?;
        partition
            .rules
            .iter()
            .filter(|rule| !skip_flagged || rule.status == RuleStatus::Stable)
            .find(|rule| rule.matches(view))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn right_vertical() -> Vec<Rule> {
    use Finger::*;
    use RuleStatus::*;

    vec![
        // Fist, thumb resting on the side of the index finger
        Rule::new(Letter::A, Stable, |v| {
            v.all(FingerState::StraightDown)
                && v.thumb_open()
                && v.near(THUMB_TIP, INDEX_FINGER_PIP)
                && v.x(THUMB_TIP) < v.x(INDEX_FINGER_PIP)
        }),
        // Flat hand, thumb across the palm
        Rule::new(Letter::B, Stable, |v| {
            v.thumb_bent() && v.all(FingerState::StraightUp)
        }),
        // Fingertips hooked down over the tucked thumb
        Rule::new(Letter::E, NeedsCorrection, |v| {
            let thumb = v.y(THUMB_TIP);
            v.thumb_bent()
                && v.y(INDEX_FINGER_TIP) < thumb
                && v.y(MIDDLE_FINGER_TIP) < thumb
                && v.y(RING_FINGER_TIP) < thumb
                && v.y(PINKY_TIP) < thumb
                && v.y(INDEX_FINGER_TIP) >= v.y(INDEX_FINGER_MCP)
                && v.y(MIDDLE_FINGER_TIP) >= v.y(MIDDLE_FINGER_MCP)
                && v.y(RING_FINGER_TIP) >= v.y(RING_FINGER_MCP)
                && v.y(PINKY_TIP) >= v.y(PINKY_MCP)
        }),
        // Index and thumb pinched, other three fingers up
        Rule::new(Letter::F, Stable, |v| {
            v.up(Middle)
                && v.up(Ring)
                && v.up(Pinky)
                && v.thumb_open()
                && !v.up(Index)
                && v.near(INDEX_FINGER_TIP, THUMB_TIP)
        }),
        // Pinky up, thumb tip lined up under the index knuckle
        Rule::new(Letter::I, Stable, |v| {
            v.x(THUMB_TIP) == v.x(INDEX_FINGER_DIP)
                && v.down(Index)
                && v.down(Middle)
                && v.down(Ring)
                && v.up(Pinky)
        }),
        // Index and middle up and spread, thumb between them
        Rule::new(Letter::K, Stable, |v| {
            v.thumb_open()
                && v.x(THUMB_TIP) >= v.x(INDEX_FINGER_MCP)
                && v.x(THUMB_TIP) <= v.x(MIDDLE_FINGER_MCP)
                && v.up(Index)
                && v.up(Middle)
                && v.down(Ring)
                && v.down(Pinky)
                && v.distance(INDEX_FINGER_TIP, MIDDLE_FINGER_TIP)
                    > v.distance(INDEX_FINGER_MCP, MIDDLE_FINGER_MCP)
        }),
        // Index up, thumb straight out to the side
        Rule::new(Letter::L, Stable, |v| {
            v.thumb_open()
                && v.x(THUMB_TIP) < v.x(THUMB_IP)
                && v.y(THUMB_TIP) >= v.y(THUMB_IP)
                && v.up(Index)
                && v.down(Middle)
                && v.down(Ring)
                && v.down(Pinky)
        }),
        // Three fingers folded over the thumb. Overlaps A.
        Rule::new(Letter::M, NeedsCorrection, |v| {
            let thumb_base = v.y(THUMB_MCP);
            v.down(Index)
                && v.y(INDEX_FINGER_TIP) >= thumb_base
                && v.down(Middle)
                && v.y(MIDDLE_FINGER_TIP) >= thumb_base
                && v.down(Ring)
                && v.y(RING_FINGER_TIP) >= thumb_base
                && v.y(RING_FINGER_TIP) == v.y(PINKY_DIP)
                && v.down(Pinky)
        }),
        // Two fingers folded over the thumb
        Rule::new(Letter::N, NeedsCorrection, |v| {
            let thumb_base = v.y(THUMB_MCP);
            v.down(Index)
                && v.y(INDEX_FINGER_TIP) >= thumb_base
                && v.down(Middle)
                && v.y(MIDDLE_FINGER_TIP) >= thumb_base
                && v.down(Ring)
                && v.y(RING_FINGER_TIP) > v.y(MIDDLE_FINGER_TIP)
                && v.x(RING_FINGER_TIP) >= v.x(MIDDLE_FINGER_TIP)
                && v.down(Pinky)
        }),
        // Index and middle crossed
        Rule::new(Letter::R, NeedsCorrection, |v| {
            v.thumb_bent()
                && v.up(Index)
                && v.x(INDEX_FINGER_TIP) >= v.x(MIDDLE_FINGER_TIP)
                && v.up(Middle)
                && v.down(Ring)
                && v.x(THUMB_TIP) >= v.x(RING_FINGER_DIP)
                && v.down(Pinky)
        }),
        // Fist with the thumb across the front of the fingers
        Rule::new(Letter::S, Unreliable, |v| {
            let thumb_base = v.y(THUMB_MCP);
            v.thumb_bent()
                && v.all(FingerState::StraightDown)
                && v.y(INDEX_FINGER_TIP) <= thumb_base
                && v.y(MIDDLE_FINGER_TIP) <= thumb_base
                && v.y(RING_FINGER_TIP) <= thumb_base
                && v.y(PINKY_TIP) <= thumb_base
                && v.x(THUMB_TIP) > v.x(MIDDLE_FINGER_DIP)
        }),
    ]
}

fn right_inclined() -> Vec<Rule> {
    use Finger::*;
    use RuleStatus::*;

    vec![
        // Index pointing sideways. Thumb should also touch the index.
        Rule::new(Letter::G, NeedsCorrection, |v| {
            v.thumb_open()
                && v.up(Index)
                && v.down(Middle)
                && v.down(Ring)
                && v.down(Pinky)
                && v.x(INDEX_FINGER_TIP) >= v.x(RING_FINGER_MCP)
        }),
        // Index and middle together, pointing sideways
        Rule::new(Letter::H, Unreliable, |v| {
            v.thumb_bent()
                && v.down(Ring)
                && v.down(Pinky)
                && v.up(Index)
                && v.up(Middle)
                && v.distance(INDEX_FINGER_TIP, MIDDLE_FINGER_TIP)
                    == v.distance(INDEX_FINGER_PIP, MIDDLE_FINGER_PIP)
        }),
    ]
}

fn right_other() -> Vec<Rule> {
    use Finger::*;
    use RuleStatus::*;

    vec![
        // Curved hand, fingertips bunched
        Rule::new(Letter::C, Stable, |v| {
            v.thumb_open()
                && v.x(INDEX_FINGER_TIP) <= v.x(THUMB_TIP)
                && v.near(INDEX_FINGER_TIP, MIDDLE_FINGER_TIP)
                && v.near(MIDDLE_FINGER_TIP, RING_FINGER_TIP)
                && v.near(RING_FINGER_TIP, PINKY_TIP)
                && !v.up(Index)
        }),
        // Index up, other fingertips closed onto the thumb
        Rule::new(Letter::D, Stable, |v| {
            v.up(Index)
                && v.thumb_open()
                && v.x(MIDDLE_FINGER_TIP) <= v.x(THUMB_TIP)
                && v.near(MIDDLE_FINGER_TIP, THUMB_TIP)
                && v.near(MIDDLE_FINGER_TIP, RING_FINGER_TIP)
                && v.near(MIDDLE_FINGER_TIP, PINKY_TIP)
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;

    fn first_match(frame: &LandmarkFrame) -> Option<Letter> {
        let features = FeatureSet::extract(frame);
        let view = HandView {
            features: &features,
            frame,
            near_threshold: geometry::NEAR_THRESHOLD,
        };
        RuleTable::standard().evaluate(&view, false).map(|r| r.letter)
    }

    /// Whether `letter`'s rule holds for this hand, ignoring rule order
    fn rule_holds(letter: Letter, frame: &LandmarkFrame) -> bool {
        let features = FeatureSet::extract(frame);
        let view = HandView {
            features: &features,
            frame,
            near_threshold: geometry::NEAR_THRESHOLD,
        };
        let table = RuleTable::standard();
        let rule = table
            .partitions()
            .iter()
            .flat_map(|p| p.rules.iter())
            .find(|r| r.letter == letter)
            .unwrap();
        rule.matches(&view)
    }

    /// `base` with some landmarks moved in the image plane
    fn pose(base: LandmarkFrame, moved: &[(usize, f32, f32)]) -> LandmarkFrame {
        let mut points = *base.points();
        for &(index, x, y) in moved {
            points[index] = Landmark::new(x, y, 0.0);
        }
        LandmarkFrame::new(points)
    }

    /// Every finger folded below the thumb base, thumb out to the side
    fn folded_over_thumb() -> LandmarkFrame {
        pose(
            fixtures::right_fist_a(),
            &[
                (THUMB_IP, 0.32, 0.76),
                (THUMB_TIP, 0.25, 0.76),
                (INDEX_FINGER_DIP, 0.44, 0.72),
                (INDEX_FINGER_TIP, 0.44, 0.82),
                (MIDDLE_FINGER_DIP, 0.50, 0.72),
                (MIDDLE_FINGER_TIP, 0.50, 0.82),
                (RING_FINGER_DIP, 0.56, 0.72),
                (RING_FINGER_TIP, 0.56, 0.81),
                (PINKY_DIP, 0.62, 0.81),
                (PINKY_TIP, 0.62, 0.84),
            ],
        )
    }

    #[test]
    fn test_partition_order() {
        let table = RuleTable::standard();
        let letters = |h, p| -> Vec<Letter> {
            table
                .partition(h, p)
                .map(|p| p.rules.iter().map(|r| r.letter).collect())
                .unwrap_or_default()
        };

        use Letter::*;
        assert_eq!(
            letters(Handedness::Right, PalmOrientation::Vertical),
            vec![A, B, E, F, I, K, L, M, N, R, S]
        );
        assert_eq!(letters(Handedness::Right, PalmOrientation::Inclined), vec![G, H]);
        assert_eq!(letters(Handedness::Right, PalmOrientation::Other), vec![C, D]);
    }

    #[test]
    fn test_left_hand_and_unknown_are_unresolved() {
        let table = RuleTable::standard();
        for palm in [
            PalmOrientation::Vertical,
            PalmOrientation::Inclined,
            PalmOrientation::Other,
        ] {
            let partition = table.partition(Handedness::Left, palm).unwrap();
            assert!(partition.rules.is_empty());
            assert!(table.partition(Handedness::Unknown, palm).is_none());
        }
    }

    #[test]
    fn test_flagged_rules() {
        let table = RuleTable::standard();
        let flagged: Vec<(Letter, RuleStatus)> = table
            .partitions()
            .iter()
            .flat_map(|p| p.rules.iter())
            .filter(|r| r.status != RuleStatus::Stable)
            .map(|r| (r.letter, r.status))
            .collect();

        assert!(flagged.contains(&(Letter::E, RuleStatus::NeedsCorrection)));
        assert!(flagged.contains(&(Letter::M, RuleStatus::NeedsCorrection)));
        assert!(flagged.contains(&(Letter::S, RuleStatus::Unreliable)));
        assert!(flagged.contains(&(Letter::H, RuleStatus::Unreliable)));
        assert!(!flagged.iter().any(|(l, _)| *l == Letter::A || *l == Letter::B));
    }

    #[test]
    fn test_rule_a() {
        assert_eq!(first_match(&fixtures::right_fist_a()), Some(Letter::A));
    }

    #[test]
    fn test_rule_a_needs_thumb_near_index() {
        // Move the thumb tip well away from the index PIP joint
        let mut points = *fixtures::right_fist_a().points();
        points[THUMB_TIP] = Landmark::new(0.26, 0.60, 0.0);
        assert_ne!(first_match(&LandmarkFrame::new(points)), Some(Letter::A));
    }

    #[test]
    fn test_rule_b() {
        assert_eq!(first_match(&fixtures::right_flat_b()), Some(Letter::B));
    }

    #[test]
    fn test_rule_l() {
        assert_eq!(first_match(&fixtures::right_l()), Some(Letter::L));
    }

    #[test]
    fn test_rule_c() {
        assert_eq!(first_match(&fixtures::right_c()), Some(Letter::C));
    }

    #[test]
    fn test_rule_g() {
        assert_eq!(first_match(&fixtures::right_g()), Some(Letter::G));
    }

    #[test]
    fn test_rule_d() {
        let frame = pose(
            fixtures::right_c(),
            &[
                (THUMB_IP, 0.46, 0.44),
                (THUMB_TIP, 0.50, 0.40),
                (INDEX_FINGER_MCP, 0.44, 0.42),
                (INDEX_FINGER_PIP, 0.44, 0.36),
                (INDEX_FINGER_DIP, 0.44, 0.30),
                (INDEX_FINGER_TIP, 0.44, 0.24),
                (MIDDLE_FINGER_TIP, 0.48, 0.40),
                (RING_FINGER_TIP, 0.50, 0.42),
                (PINKY_TIP, 0.52, 0.43),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::D));
    }

    #[test]
    fn test_rule_e() {
        // Thumb base pulled low so the tucked thumb sits under every fingertip
        let frame = pose(
            fixtures::right_fist_a(),
            &[
                (THUMB_MCP, 0.30, 0.85),
                (THUMB_IP, 0.42, 0.78),
                (THUMB_TIP, 0.50, 0.78),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::E));
    }

    #[test]
    fn test_rule_f() {
        let frame = pose(
            fixtures::right_flat_b(),
            &[
                (THUMB_IP, 0.38, 0.74),
                (THUMB_TIP, 0.40, 0.70),
                (INDEX_FINGER_PIP, 0.44, 0.58),
                (INDEX_FINGER_DIP, 0.44, 0.64),
                (INDEX_FINGER_TIP, 0.44, 0.68),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::F));
    }

    #[test]
    fn test_rule_h() {
        // Same spacing at the tips and the PIP joints
        let frame = pose(
            fixtures::right_g(),
            &[
                (THUMB_IP, 0.45, 0.68),
                (THUMB_TIP, 0.50, 0.70),
                (INDEX_FINGER_MCP, 0.45, 0.65),
                (INDEX_FINGER_PIP, 0.45, 0.58),
                (INDEX_FINGER_DIP, 0.45, 0.52),
                (INDEX_FINGER_TIP, 0.45, 0.46),
                (MIDDLE_FINGER_MCP, 0.50, 0.64),
                (MIDDLE_FINGER_PIP, 0.50, 0.58),
                (MIDDLE_FINGER_DIP, 0.50, 0.52),
                (MIDDLE_FINGER_TIP, 0.50, 0.46),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::H));

        // Any spread at the tips breaks the equality
        let spread = pose(frame, &[(MIDDLE_FINGER_TIP, 0.51, 0.46)]);
        assert!(!rule_holds(Letter::H, &spread));
    }

    #[test]
    fn test_rule_i() {
        let frame = pose(
            fixtures::right_fist_a(),
            &[
                (THUMB_IP, 0.40, 0.76),
                (THUMB_TIP, 0.44, 0.74),
                (PINKY_PIP, 0.62, 0.62),
                (PINKY_DIP, 0.62, 0.56),
                (PINKY_TIP, 0.62, 0.51),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::I));

        let off_by_a_hair = pose(frame, &[(THUMB_TIP, 0.441, 0.74)]);
        assert!(!rule_holds(Letter::I, &off_by_a_hair));
    }

    #[test]
    fn test_rule_k() {
        let frame = pose(
            fixtures::right_fist_a(),
            &[
                (THUMB_IP, 0.44, 0.66),
                (THUMB_TIP, 0.47, 0.58),
                (INDEX_FINGER_PIP, 0.42, 0.54),
                (INDEX_FINGER_DIP, 0.40, 0.48),
                (INDEX_FINGER_TIP, 0.38, 0.43),
                (MIDDLE_FINGER_PIP, 0.52, 0.52),
                (MIDDLE_FINGER_DIP, 0.54, 0.46),
                (MIDDLE_FINGER_TIP, 0.56, 0.41),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::K));
    }

    #[test]
    fn test_rule_m() {
        let frame = folded_over_thumb();
        assert_eq!(first_match(&frame), Some(Letter::M));

        let ring_tip_off = pose(frame, &[(RING_FINGER_TIP, 0.56, 0.811)]);
        assert!(!rule_holds(Letter::M, &ring_tip_off));
    }

    #[test]
    fn test_rule_n() {
        let frame = pose(folded_over_thumb(), &[(RING_FINGER_TIP, 0.56, 0.84)]);
        assert_eq!(first_match(&frame), Some(Letter::N));
    }

    #[test]
    fn test_rule_r() {
        // Index leaning over the middle finger so the tips cross
        let frame = pose(
            fixtures::right_fist_a(),
            &[
                (THUMB_IP, 0.50, 0.64),
                (THUMB_TIP, 0.57, 0.66),
                (INDEX_FINGER_PIP, 0.46, 0.54),
                (INDEX_FINGER_DIP, 0.49, 0.48),
                (INDEX_FINGER_TIP, 0.52, 0.43),
                (MIDDLE_FINGER_PIP, 0.49, 0.52),
                (MIDDLE_FINGER_DIP, 0.48, 0.46),
                (MIDDLE_FINGER_TIP, 0.47, 0.41),
            ],
        );
        assert_eq!(first_match(&frame), Some(Letter::R));
    }

    #[test]
    fn test_rule_s() {
        let frame = pose(
            fixtures::right_fist_a(),
            &[(THUMB_IP, 0.46, 0.68), (THUMB_TIP, 0.54, 0.70)],
        );
        assert_eq!(first_match(&frame), Some(Letter::S));
    }

    #[test]
    fn test_earlier_rule_wins_overlap() {
        // Folded fingers satisfy M, but the thumb against the index
        // knuckle also satisfies A, which comes first
        let frame = pose(
            folded_over_thumb(),
            &[(THUMB_IP, 0.38, 0.68), (THUMB_TIP, 0.40, 0.60)],
        );
        assert!(rule_holds(Letter::A, &frame));
        assert!(rule_holds(Letter::M, &frame));
        assert_eq!(first_match(&frame), Some(Letter::A));
    }

    #[test]
    fn test_skip_flagged() {
        let frame = fixtures::right_g();
        let features = FeatureSet::extract(&frame);
        let view = HandView {
            features: &features,
            frame: &frame,
            near_threshold: geometry::NEAR_THRESHOLD,
        };
        let table = RuleTable::standard();
        assert_eq!(table.evaluate(&view, false).map(|r| r.letter), Some(Letter::G));
        assert!(table.evaluate(&view, true).is_none());
    }

    #[test]
    fn test_open_palm_matches_nothing() {
        assert_eq!(first_match(&fixtures::right_open_palm()), None);
    }
}
