use super::tolerance::EPS_LEN;
use crate::model::Vec2;

/// Circle whose diameter is the segment `a`-`b`: (center, squared radius).
#[inline]
pub fn diameter_circle(a: Vec2, b: Vec2) -> (Vec2, f64) {
    let c = Vec2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
    (c, a.distance_sq(b) * 0.25)
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// `None` when `a` and `b` coincide.
pub fn line_distance(p: Vec2, a: Vec2, b: Vec2) -> Option<f64> {
    // line: ka*x + kb*y + kc = 0
    let ka = b.y - a.y;
    let kb = a.x - b.x;
    let kc = b.x * a.y - a.x * b.y;
    let norm2 = ka * ka + kb * kb;
    if norm2 <= EPS_LEN {
        return None;
    }
    Some((ka * p.x + kb * p.y + kc).abs() / norm2.sqrt())
}
