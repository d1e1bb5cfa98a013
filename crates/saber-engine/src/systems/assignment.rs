//! Which duel player owns each detected hand and face.
//!
//! Player 0 plays on the left of the (mirrored) image, player 1 on the right.

use glam::Vec2;

use crate::core::geometry::{distance, hand_center};
use crate::input::landmarks::{FaceLandmarks, HandLandmarks};

/// Normalized x dividing the two duel halves.
pub const SCREEN_SPLIT: f32 = 0.5;

fn side_of(x: f32) -> usize {
    if x < SCREEN_SPLIT {
        0
    } else {
        1
    }
}

/// Face centres per player slot. Two faces are ordered by x; a single face
/// goes to the half that contains it.
pub fn faces_by_side(faces: &[FaceLandmarks]) -> [Option<Vec2>; 2] {
    match faces {
        [] => [None, None],
        [only] => {
            let c = only.center();
            let mut out = [None, None];
            out[side_of(c.x)] = Some(c);
            out
        }
        [a, b, ..] => {
            let (a, b) = (a.center(), b.center());
            if a.x <= b.x {
                [Some(a), Some(b)]
            } else {
                [Some(b), Some(a)]
            }
        }
    }
}

/// Partition hands between the two players.
///
/// With both faces tracked a hand belongs to the nearer face; otherwise the
/// screen is split down the middle.
pub fn split_hands<'a>(
    hands: &'a [HandLandmarks],
    faces: &[Option<Vec2>; 2],
) -> [Vec<&'a HandLandmarks>; 2] {
    let mut out: [Vec<&HandLandmarks>; 2] = [Vec::new(), Vec::new()];
    for hand in hands {
        let center = hand_center(hand);
        let side = match faces {
            [Some(left), Some(right)] => {
                if distance(center, *left) <= distance(center, *right) {
                    0
                } else {
                    1
                }
            }
            _ => side_of(center.x),
        };
        out[side].push(hand);
    }
    out
}
