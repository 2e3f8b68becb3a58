//! Scoring judge
//!
//! Pure geometric predicates. Exactly-once delivery is the match state's job
//! (point-awarded flag); these functions only answer "is this a point".

use super::body::{Body, Side};
use super::collision::{ContactEvent, ContactKind};
use super::obstacle::Basket;
use crate::tuning::GoalRule;

/// Ball is through the hoop: inside the rim horizontally and either sitting in
/// the scoring band without rising, or having crossed the band's top edge
/// from above this tick.
pub fn basket_scores(body: &Body, basket: &Basket) -> bool {
    let t = &basket.tuning;
    if (body.pos.x - basket.center.x).abs() >= t.rim_half_width {
        return false;
    }
    let band_top = basket.center.y + t.band_top;
    let band_bottom = basket.center.y + t.band_bottom;

    let in_band = body.pos.y >= band_top && body.pos.y <= band_bottom && body.vel.y > -t.down_tolerance;
    let crossed = body.prev_pos.y < band_top && body.pos.y >= band_top;
    in_band || crossed
}

/// Side awarded the point when the projectile reaches the ground line.
///
/// Landing left of center scores for the right side and vice versa; the
/// center column itself counts as the left half landing.
pub fn floor_out(body: &Body, ground_y: f32, center_x: f32) -> Option<Side> {
    if body.pos.y < ground_y {
        return None;
    }
    if body.pos.x > center_x {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

/// Post-resolution judge for one tick
pub fn judge(
    rule: &GoalRule,
    body: &Body,
    contacts: &[ContactEvent],
    center_x: f32,
    shooter: Side,
) -> Option<Side> {
    match *rule {
        GoalRule::Basket => contacts
            .iter()
            .any(|c| c.kind == ContactKind::Score)
            .then_some(shooter),
        GoalRule::FloorOut { ground_y } => floor_out(body, ground_y, center_x),
    }
}
