//! Stateless 2D collision predicates and the blade queries built on them.
//!
//! All inputs here are render-space. Degenerate geometry (zero-length
//! segments, parallel lines) has defined answers and never fails.

use glam::Vec2;

use crate::api::config::{CombatConfig, EnemyConfig, Viewport};
use crate::components::enemy::Enemy;
use crate::core::geometry::{Rect, Segment};

/// Below this |cross product| two directions count as parallel.
const PARALLEL_EPS: f32 = 1e-9;

/// Distance from `p` to segment `v`–`w` (clamped projection).
/// A zero-length segment degrades to point distance.
pub fn point_segment_distance(p: Vec2, v: Vec2, w: Vec2) -> f32 {
    let vw = w - v;
    let len_sq = vw.length_squared();
    if len_sq == 0.0 {
        return p.distance(v);
    }
    let t = ((p - v).dot(vw) / len_sq).clamp(0.0, 1.0);
    p.distance(v + vw * t)
}

/// Intersection point of segments `a0`–`a1` and `b0`–`b1`, if both
/// parameters land in [0, 1]. Parallel and collinear pairs give `None`.
pub fn segment_segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<Vec2> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.perp_dot(s);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a0 + r * t)
    } else {
        None
    }
}

/// True if either endpoint is inside `rect` or the segment crosses one of its edges.
pub fn segment_rect_intersect(seg: &Segment, rect: &Rect) -> bool {
    if rect.contains(seg.base) || rect.contains(seg.tip) {
        return true;
    }
    rect.edges().iter().any(|edge| {
        segment_segment_intersection(seg.base, seg.tip, edge.base, edge.tip).is_some()
    })
}

/// Two-tier clash test. Returns the contact point.
///
/// First a true crossing; failing that, a tip within `threshold` of the other
/// blade, which catches fast swings that pass each other between samples.
pub fn blade_clash(a: &Segment, b: &Segment, threshold: f32) -> Option<Vec2> {
    if let Some(p) = segment_segment_intersection(a.base, a.tip, b.base, b.tip) {
        return Some(p);
    }
    if point_segment_distance(a.tip, b.base, b.tip) < threshold {
        return Some(a.tip);
    }
    if point_segment_distance(b.tip, a.base, a.tip) < threshold {
        return Some(b.tip);
    }
    None
}

/// Where a duel defender can be hit: a box on their face when it is tracked,
/// otherwise the fixed region for their side of the screen.
pub fn defender_hitbox(
    face: Option<Vec2>,
    side: usize,
    combat: &CombatConfig,
    viewport: &Viewport,
) -> Rect {
    match face {
        Some(center) => Rect::from_center(viewport.to_render(center), combat.face_box),
        None => combat.side_boxes[side.min(1)].map(|p| viewport.to_render(p)),
    }
}

/// Text-sized box centred on an enemy.
pub fn enemy_hitbox(enemy: &Enemy, config: &EnemyConfig, viewport: &Viewport) -> Rect {
    let chars = enemy.text.chars().count().max(1) as f32;
    Rect::from_center(
        viewport.to_render(enemy.pos),
        Vec2::new(chars * config.glyph_width, config.glyph_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EnemyId;

    const EPS: f32 = 1e-4;

    fn seg(ax: f32, ay: f32, bx: f32, by: f32) -> Segment {
        Segment::new(Vec2::new(ax, ay), Vec2::new(bx, by))
    }

    #[test]
    fn point_distance_projects_and_clamps() {
        let v = Vec2::new(0.0, 0.0);
        let w = Vec2::new(10.0, 0.0);
        assert!((point_segment_distance(Vec2::new(5.0, 3.0), v, w) - 3.0).abs() < EPS);
        assert!((point_segment_distance(Vec2::new(13.0, 4.0), v, w) - 5.0).abs() < EPS);
        assert!((point_segment_distance(Vec2::new(-3.0, 0.0), v, w) - 3.0).abs() < EPS);
    }

    #[test]
    fn point_distance_degenerate_segment() {
        let v = Vec2::new(1.0, 1.0);
        assert!((point_segment_distance(Vec2::new(4.0, 5.0), v, v) - 5.0).abs() < EPS);
    }

    #[test]
    fn crossing_segments_meet_at_known_point() {
        let p = segment_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .unwrap();
        assert!((p - Vec2::new(5.0, 5.0)).length() < EPS);

        let q = segment_segment_intersection(
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 9.0),
            Vec2::new(-4.0, 3.0),
            Vec2::new(8.0, 3.0),
        )
        .unwrap();
        assert!((q - Vec2::new(2.0, 3.0)).length() < EPS);
    }

    #[test]
    fn parallel_and_collinear_do_not_intersect() {
        assert!(segment_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());
        // overlapping collinear: deliberately no intersection
        assert!(segment_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn lines_crossing_outside_segments() {
        assert!(segment_segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn zero_length_segments_are_safe() {
        let p = Vec2::new(3.0, 3.0);
        assert!(segment_segment_intersection(p, p, Vec2::ZERO, Vec2::new(6.0, 6.0)).is_none());
        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(segment_rect_intersect(&Segment::new(p, p), &r));
        assert!(!segment_rect_intersect(&seg(20.0, 20.0, 20.0, 20.0), &r));
    }

    #[test]
    fn rect_endpoint_inside() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(segment_rect_intersect(&seg(5.0, 5.0, 50.0, 50.0), &r));
    }

    #[test]
    fn rect_crossed_without_endpoints_inside() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // passes clean through
        assert!(segment_rect_intersect(&seg(-5.0, 5.0, 15.0, 5.0), &r));
        // clips the corner, in through the left edge and out through the top
        assert!(segment_rect_intersect(&seg(-2.0, 3.0, 3.0, -2.0), &r));
        // stops exactly on the left edge
        assert!(segment_rect_intersect(&seg(-5.0, 5.0, 0.0, 5.0), &r));
        // misses
        assert!(!segment_rect_intersect(&seg(-5.0, 20.0, 15.0, 20.0), &r));
    }

    #[test]
    fn clash_on_direct_crossing() {
        let a = seg(0.0, 0.0, 100.0, 100.0);
        let b = seg(0.0, 100.0, 100.0, 0.0);
        let p = blade_clash(&a, &b, 50.0).unwrap();
        assert!((p - Vec2::new(50.0, 50.0)).length() < EPS);
    }

    #[test]
    fn clash_tolerance_tier_catches_near_miss() {
        // Parallel blades passing 30 units apart, tips overlapping the other blade.
        let a = seg(100.0, 100.0, 400.0, 100.0);
        let b = seg(500.0, 130.0, 200.0, 130.0);
        assert!(segment_segment_intersection(a.base, a.tip, b.base, b.tip).is_none());
        let p = blade_clash(&a, &b, 50.0).unwrap();
        assert_eq!(p, a.tip);
    }

    #[test]
    fn no_clash_when_far_apart() {
        let a = seg(0.0, 0.0, 100.0, 0.0);
        let b = seg(0.0, 200.0, 100.0, 200.0);
        assert!(blade_clash(&a, &b, 50.0).is_none());
    }

    #[test]
    fn hitbox_uses_face_then_side() {
        let combat = CombatConfig::default();
        let vp = Viewport::default();
        let face_box = defender_hitbox(Some(Vec2::new(0.5, 0.5)), 1, &combat, &vp);
        assert_eq!(face_box.center(), Vec2::new(640.0, 360.0));
        assert!((face_box.max.x - face_box.min.x - 180.0).abs() < EPS);

        let right = defender_hitbox(None, 1, &combat, &vp);
        assert!(right.min.x > vp.width * 0.5);
        let left = defender_hitbox(None, 0, &combat, &vp);
        assert!(left.max.x < vp.width * 0.5);
    }

    #[test]
    fn enemy_box_scales_with_text() {
        let cfg = EnemyConfig::default();
        let vp = Viewport::default();
        let enemy = Enemy {
            id: EnemyId(1),
            pos: Vec2::new(0.5, 0.5),
            word: 0,
            text: "BUG".into(),
            speed: 0.1,
            alive: true,
        };
        let r = enemy_hitbox(&enemy, &cfg, &vp);
        assert!((r.max.x - r.min.x - 54.0).abs() < EPS);
        assert!(r.contains(Vec2::new(640.0, 360.0)));
    }
}
