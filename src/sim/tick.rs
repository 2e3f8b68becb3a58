//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically. Order within a
//! tick is fixed: round gate, paddles, shot, integrator, resolver, judge,
//! round timers, AI.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Side;
use super::collision::{self, ContactEvent};
use super::integrator;
use super::scoring;
use super::state::{GameState, RoundState};
use crate::consts::TICK;
use crate::tuning::GoalRule;

/// Move toward an x coordinate at up to `speed` per tick (AI steering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Steer {
    pub target_x: f32,
    pub speed: f32,
}

/// Decoded per-side intents for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub fast_fall: bool,
    pub swing: bool,
    /// Pointer drag vector for a basketball shot
    pub shoot: Option<Vec2>,
    pub steer: Option<Steer>,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: Intents,
    pub right: Intents,
}

impl TickInput {
    pub fn side(&self, side: Side) -> &Intents {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Largest drag length that still adds power to a shot
pub const MAX_SHOT_DRAG: f32 = 200.0;

/// Velocity of a basketball shot for a pointer drag (the ball flies opposite the drag)
pub fn shot_velocity(drag: Vec2) -> Option<Vec2> {
    let len = drag.length();
    if len <= 0.0 || !len.is_finite() {
        return None;
    }
    let power = len.min(MAX_SHOT_DRAG);
    Some(-drag / len * power / 10.0)
}

/// Advance the game state by one fixed timestep.
///
/// Returns the contacts resolved this tick; match-level events accumulate in
/// `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<ContactEvent> {
    if state.round == RoundState::MatchOver {
        return Vec::new();
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    if state.round == RoundState::Serving {
        state.spawn_serve();
    }

    // Paddles: humans from the caller, CPU sides from last tick's AI
    for paddle in state.paddles.iter_mut() {
        let side = paddle.side;
        let intents = if state.settings.is_cpu(side) {
            &state.pending_ai[side.index()]
        } else {
            input.side(side)
        };
        let bounds = state.tuning.paddle_bounds(side);
        paddle.drive(intents, &state.tuning.paddle, bounds);
    }

    if state.tuning.rules.goal == GoalRule::Basket {
        let shooter = state.shooter();
        if !state.settings.is_cpu(shooter) {
            if let (Some(drag), Some(ball)) = (input.side(shooter).shoot, state.projectile.as_mut()) {
                if let Some(vel) = shot_velocity(drag) {
                    ball.vel = vel;
                    log::debug!("Shot with drag {drag} -> {vel}");
                }
            }
        }
    }

    let score_armed = state.round == RoundState::Rallying && !state.point_awarded;
    let mut contacts = Vec::new();
    if let Some(ball) = state.projectile.as_mut() {
        integrator::advance(ball, &state.tuning.kinematics, TICK);
        contacts = collision::resolve(
            ball,
            &state.obstacles,
            &mut state.paddles,
            &state.tuning,
            score_armed,
            now,
            &mut state.rng,
        );
    }

    if score_armed {
        let scorer = state.projectile.as_ref().and_then(|ball| {
            scoring::judge(
                &state.tuning.rules.goal,
                ball,
                &contacts,
                state.tuning.center_x(),
                state.shooter(),
            )
        });
        if let Some(side) = scorer {
            state.award_point(side);
        }
    }

    if state.round == RoundState::PointPausing {
        state.countdown = state.countdown.saturating_sub(1);
        if state.countdown == 0 {
            state.round = RoundState::Serving;
        }
    }

    if let Some(left) = state.time_left {
        let left = left.saturating_sub(1);
        state.time_left = Some(left);
        if left == 0 && state.round != RoundState::MatchOver {
            log::info!("Time is up");
            state.finish();
        }
    }

    state.tick_announcement();
    state.run_ai();

    contacts
}
