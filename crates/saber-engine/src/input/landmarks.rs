//! Per-frame tracker input: hand landmarks, face centres, and the flat
//! `Float32Array` layout the browser hands us.

use glam::{Vec2, Vec3};

use crate::api::error::FrameError;
use crate::api::types::Handedness;

/// Landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Upper bound on hands per frame (two players, two hands each).
pub const MAX_HANDS: usize = 4;

/// Upper bound on tracked faces per frame.
pub const MAX_FACES: usize = 2;

/// Floats per hand in the flat layout: handedness code, then x/y/z per landmark.
pub const HAND_FLOATS: usize = 1 + LANDMARK_COUNT * 3;

/// Floats per face in the flat layout: centre x, y.
pub const FACE_FLOATS: usize = 2;

/// Hand landmark indices (tracker convention).
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// One detected hand: 21 landmarks plus the tracker's handedness label.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
    handedness: Handedness,
}

impl HandLandmarks {
    /// Validate and copy a hand. Rejects wrong point counts and NaN/inf.
    pub fn new(points: &[Vec3], handedness: Handedness) -> Result<Self, FrameError> {
        if points.len() != LANDMARK_COUNT {
            return Err(FrameError::WrongPointCount {
                expected: LANDMARK_COUNT,
                got: points.len(),
            });
        }
        if let Some(landmark) = points.iter().position(|p| !p.is_finite()) {
            return Err(FrameError::NonFinite { landmark });
        }
        let mut fixed = [Vec3::ZERO; LANDMARK_COUNT];
        fixed.copy_from_slice(points);
        Ok(Self {
            points: fixed,
            handedness,
        })
    }

    /// 2D position of landmark `i` (z dropped).
    #[inline]
    pub fn point(&self, i: usize) -> Vec2 {
        self.points[i].truncate()
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }
}

/// One tracked face, reduced to a single stable centre point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLandmarks {
    center: Vec2,
}

impl FaceLandmarks {
    pub fn new(center: Vec2) -> Result<Self, FrameError> {
        if !center.is_finite() {
            return Err(FrameError::NonFiniteFace);
        }
        Ok(Self { center })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }
}

/// Everything the tracker saw this frame. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    hands: Vec<HandLandmarks>,
    faces: Vec<FaceLandmarks>,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<HandLandmarks>, faces: Vec<FaceLandmarks>) -> Result<Self, FrameError> {
        if hands.len() > MAX_HANDS {
            return Err(FrameError::TooManyHands(hands.len()));
        }
        if faces.len() > MAX_FACES {
            return Err(FrameError::TooManyFaces(faces.len()));
        }
        Ok(Self { hands, faces })
    }

    /// A frame in which the tracker saw nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode the flat layout written by the browser tracker glue.
    ///
    /// `hand_data` holds `HAND_FLOATS` per hand (handedness code 0 = Left,
    /// 1 = Right, then x, y, z for each landmark). `face_data` holds
    /// `FACE_FLOATS` per face.
    pub fn from_flat(hand_data: &[f32], face_data: &[f32]) -> Result<Self, FrameError> {
        if hand_data.len() % HAND_FLOATS != 0 {
            return Err(FrameError::Truncated {
                expected: HAND_FLOATS,
                got: hand_data.len(),
            });
        }
        if face_data.len() % FACE_FLOATS != 0 {
            return Err(FrameError::Truncated {
                expected: FACE_FLOATS,
                got: face_data.len(),
            });
        }

        let mut hands = Vec::with_capacity(hand_data.len() / HAND_FLOATS);
        for chunk in hand_data.chunks_exact(HAND_FLOATS) {
            let handedness = Handedness::from_code(chunk[0])
                .ok_or(FrameError::UnknownHandedness(chunk[0]))?;
            let points: Vec<Vec3> = chunk[1..]
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect();
            hands.push(HandLandmarks::new(&points, handedness)?);
        }

        let faces = face_data
            .chunks_exact(FACE_FLOATS)
            .map(|c| FaceLandmarks::new(Vec2::new(c[0], c[1])))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(hands, faces)
    }

    pub fn hands(&self) -> &[HandLandmarks] {
        &self.hands
    }

    pub fn faces(&self) -> &[FaceLandmarks] {
        &self.faces
    }
}
