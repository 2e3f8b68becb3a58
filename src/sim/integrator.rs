//! Kinematics integrator
//!
//! Explicit Euler in a fixed order: gravity, velocity clamp, drag, position.
//! Positions advance by truncated (integer pixel) deltas.

use super::body::Body;
use crate::truncate;
use crate::tuning::Kinematics;

/// Advance a body by one step of `dt` ticks
pub fn advance(body: &mut Body, kin: &Kinematics, dt: f32) {
    body.prev_pos = body.pos;

    body.vel.y += kin.gravity * dt;

    body.vel.y = body.vel.y.clamp(-kin.max_ascent, kin.max_fall);
    body.vel.x = body.vel.x.clamp(-kin.max_speed_x, kin.max_speed_x);

    body.vel.x *= kin.drag_x.powf(dt);
    body.vel.y *= kin.drag_y.powf(dt);

    body.pos += truncate(body.vel * dt);
}
