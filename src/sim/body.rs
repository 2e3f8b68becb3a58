//! Bodies and hit surfaces
//!
//! The projectile and every paddle (hand, racket, player) share one `Body`
//! record. Paddles add the per-side state needed to drive them from intents.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tick::Intents;
use crate::tuning::{HitStyle, PaddleTuning};

/// One half of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Horizontal sign pointing at the other half
    pub fn toward_opponent(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Half of the court that contains `x` (the center column belongs to the right)
    pub fn of_x(x: f32, center_x: f32) -> Side {
        if x < center_x { Side::Left } else { Side::Right }
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Box { half: Vec2 },
}

impl Shape {
    /// Half extents of the bounding box
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Box { half } => half,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Projectile,
    Paddle,
}

/// A moving body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub pos: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    /// Tick of the last net contact (re-entry guard)
    #[serde(default)]
    pub last_net_tick: Option<u64>,
}

impl Body {
    pub fn new(id: u32, kind: BodyKind, pos: Vec2, shape: Shape) -> Self {
        Self {
            id,
            kind,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            shape,
            last_net_tick: None,
        }
    }

    pub fn projectile(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        let mut body = Self::new(id, BodyKind::Projectile, pos, Shape::Circle { radius });
        body.vel = vel;
        body
    }

    /// Collision radius (smallest half extent for boxes)
    pub fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Box { half } => half.min_element(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Whether the net re-entry guard is still running at tick `now`
    pub fn net_guarded(&self, now: u64, guard_ticks: u64) -> bool {
        self.last_net_tick
            .is_some_and(|last| now.saturating_sub(last) < guard_ticks)
    }
}

/// A hit surface owned by one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Body,
    pub side: Side,
    pub on_ground: bool,
    /// Ticks left in the current swing
    pub swing_ticks: u32,
}

impl Paddle {
    pub fn new(id: u32, side: Side, pos: Vec2, shape: Shape) -> Self {
        Self {
            body: Body::new(id, BodyKind::Paddle, pos, shape),
            side,
            on_ground: false,
            swing_ticks: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_swinging(&self) -> bool {
        self.swing_ticks > 0
    }

    /// Whether the surface is in its "active" mode for the given hit style
    pub fn is_active(&self, style: &HitStyle) -> bool {
        match style {
            HitStyle::Hand(_) => !self.on_ground,
            HitStyle::Racket(_) => self.is_swinging(),
            HitStyle::Volley(_) => true,
        }
    }

    /// Apply one tick of intents: horizontal movement, jump, gravity, limits, swing
    pub fn drive(&mut self, intents: &Intents, tuning: &PaddleTuning, bounds: (f32, f32)) {
        let (min_x, max_x) = bounds;
        let body = &mut self.body;
        body.prev_pos = body.pos;

        let mut step = match (intents.move_left, intents.move_right) {
            (true, false) => -tuning.move_speed,
            (false, true) => tuning.move_speed,
            _ => 0.0,
        };
        if let Some(steer) = intents.steer {
            step = (steer.target_x - body.pos.x).clamp(-steer.speed, steer.speed);
        }

        match tuning.friction {
            Some(friction) => {
                body.vel.x *= friction;
                if step != 0.0 || intents.steer.is_some() {
                    body.vel.x = step;
                }
            }
            None => body.vel.x = step,
        }
        body.pos.x += body.vel.x;

        if intents.jump && self.on_ground {
            body.vel.y = -tuning.jump_speed;
            self.on_ground = false;
        }
        if intents.fast_fall && !self.on_ground {
            body.vel.y += tuning.fast_fall;
        }
        body.vel.y += tuning.gravity;
        body.pos.y += body.vel.y;

        if body.pos.y >= tuning.ground_y {
            body.pos.y = tuning.ground_y;
            body.vel.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        if let Some((ceiling_y, factor)) = tuning.ceiling {
            if body.pos.y < ceiling_y {
                body.pos.y = ceiling_y;
                body.vel.y = body.vel.y.abs() * factor;
            }
        }

        if min_x <= max_x {
            let clamped = body.pos.x.clamp(min_x, max_x);
            if clamped != body.pos.x {
                body.pos.x = clamped;
                body.vel.x = 0.0;
            }
        }

        if self.swing_ticks > 0 {
            self.swing_ticks -= 1;
        }
        if intents.swing && self.swing_ticks == 0 && tuning.swing_ticks > 0 {
            self.swing_ticks = tuning.swing_ticks;
        }
    }
}
