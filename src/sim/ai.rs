//! Opponent AI controller
//!
//! A small reactive state machine per CPU side. Difficulty only changes the
//! numbers (`AiProfile`); sport-specific behavior comes from `AiTuning`.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Paddle, Side};
use super::tick::{Intents, Steer};
use crate::settings::Difficulty;
use crate::tuning::{ActionTrigger, Kinematics, SportTuning, TrackingMode};

/// Per-difficulty reaction numbers, shared by every sport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Ticks to wait after the projectile enters the AI's half
    pub reaction_delay: u32,
    /// Target error, drawn uniformly from `[-dev, dev)` each tick
    pub aim_deviation: f32,
    /// Max horizontal step per tick
    pub move_speed: f32,
    /// Chance (percent) that a triggered action is taken
    pub action_probability: u32,
    /// Chance (percent) that the paddle moves on a given tick
    pub move_gate: u32,
}

impl AiProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (reaction_delay, aim_deviation, move_speed, action_probability, move_gate) = match difficulty {
            Difficulty::Easy => (40, 100.0, 5.0, 15, 60),
            Difficulty::Medium => (25, 60.0, 7.0, 40, 67),
            Difficulty::Hard => (15, 25.0, 10.0, 60, 75),
            Difficulty::Expert => (8, 10.0, 10.0, 75, 85),
            Difficulty::Impossible => (0, 1.0, 12.0, 90, 95),
        };
        Self {
            reaction_delay,
            aim_deviation,
            move_speed,
            action_probability,
            move_gate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiPhase {
    Idle,
    Tracking,
    ActingOnCooldown,
}

/// CPU controller for one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    pub side: Side,
    pub phase: AiPhase,
    /// Ticks waited during the current approach (`None` = not approaching)
    reaction_elapsed: Option<u32>,
    cooldown: u32,
    smoothed_target: Option<f32>,
}

impl AiController {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            phase: AiPhase::Idle,
            reaction_elapsed: None,
            cooldown: 0,
            smoothed_target: None,
        }
    }

    /// Forget the current approach (new serve)
    pub fn reset(&mut self) {
        self.phase = AiPhase::Idle;
        self.reaction_elapsed = None;
        self.smoothed_target = None;
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Observe the world and produce intents for the next tick
    pub fn think(
        &mut self,
        profile: &AiProfile,
        tuning: &SportTuning,
        paddle: &Paddle,
        projectile: Option<&Body>,
        rng: &mut Pcg32,
    ) -> Intents {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }

        let Some(ball) = projectile else {
            self.reset();
            return Intents::default();
        };

        let ai = &tuning.ai;
        let on_our_half = !ai.guards_half || Side::of_x(ball.pos.x, tuning.center_x()) == self.side;
        if !on_our_half {
            self.reset();
            return Intents::default();
        }

        let waited = self.reaction_elapsed.get_or_insert(0);
        if *waited < profile.reaction_delay {
            *waited += 1;
            self.phase = AiPhase::Idle;
            return Intents::default();
        }

        let raw = match ai.tracking {
            TrackingMode::Direct => ball.pos.x,
            TrackingMode::Intercept { contact_height } => {
                predict_x_at_height(ball, &tuning.kinematics, paddle.pos().y - contact_height)
                    .unwrap_or(ball.pos.x)
            }
        };
        let dev = profile.aim_deviation;
        let target = if dev > 0.0 {
            raw + rng.random_range(-dev..dev)
        } else {
            raw
        };

        let smoothing = ai.smoothing.clamp(0.0, 1.0);
        let filtered = match self.smoothed_target {
            Some(prev) => prev + (target - prev) * smoothing,
            None => target,
        };
        self.smoothed_target = Some(filtered);

        let (min_x, max_x) = tuning.paddle_bounds(self.side);
        let goal = if min_x <= max_x {
            filtered.clamp(min_x, max_x)
        } else {
            paddle.pos().x
        };

        let mut intents = Intents::default();
        if (goal - paddle.pos().x).abs() > ai.deadband && rng.random_range(0..100) < profile.move_gate {
            intents.steer = Some(Steer {
                target_x: goal,
                speed: profile.move_speed,
            });
        }

        self.phase = if self.cooldown > 0 {
            AiPhase::ActingOnCooldown
        } else {
            AiPhase::Tracking
        };

        if paddle.on_ground
            && self.cooldown == 0
            && trigger_holds(&ai.jump, ball, paddle, tuning)
            && rng.random_range(0..100) < profile.action_probability
        {
            intents.jump = true;
            self.cooldown = ai.action_cooldown.max(profile.reaction_delay);
            self.phase = AiPhase::ActingOnCooldown;
            log::debug!("{} AI jumps (cooldown {})", self.side.as_str(), self.cooldown);
        }

        if let Some(trigger) = &ai.swing {
            if !paddle.is_swinging()
                && trigger_holds(trigger, ball, paddle, tuning)
                && rng.random_range(0..100) < profile.action_probability
            {
                intents.swing = true;
                log::debug!("{} AI swings", self.side.as_str());
            }
        }

        intents
    }
}

fn trigger_holds(trigger: &ActionTrigger, ball: &Body, paddle: &Paddle, tuning: &SportTuning) -> bool {
    let p = paddle.pos();
    match *trigger {
        ActionTrigger::Proximity { reach_x, reach_y } => {
            (ball.pos.x - p.x).abs() < reach_x && (ball.pos.y - p.y).abs() < reach_y
        }
        ActionTrigger::Overhead { margin } => ball.pos.y < p.y - margin,
        ActionTrigger::Lookahead { ticks, reach } => {
            ball.vel.y > 0.0 && ball.pos.y + ticks * ball.vel.y > p.y - reach
        }
        ActionTrigger::ApexTiming { window, max_angle_deg } => {
            let kin = &tuning.kinematics;
            let (apex_ticks, rise) = tuning.paddle.jump_apex();
            let contact = match tuning.ai.tracking {
                TrackingMode::Intercept { contact_height } => contact_height,
                TrackingMode::Direct => 0.0,
            };
            let apex_y = p.y - rise - contact;
            let Some(t) = time_to_height(ball.pos.y, ball.vel.y, kin.gravity, apex_y) else {
                return false;
            };
            let vy = ball.vel.y + kin.gravity * t;
            let vx = ball.vel.x * kin.drag_x.powf(t);
            let off_vertical = vx.abs().atan2(vy).to_degrees();
            vy > 0.0 && off_vertical <= max_angle_deg && (t - apex_ticks as f32).abs() <= window
        }
    }
}

/// Smallest positive `t` with `y0 + vy·t + ½·g·t² = y_target`
pub fn time_to_height(y0: f32, vy: f32, g: f32, y_target: f32) -> Option<f32> {
    let c = y0 - y_target;
    if g.abs() < f32::EPSILON {
        if vy.abs() < f32::EPSILON {
            return None;
        }
        let t = -c / vy;
        return (t > 0.0).then_some(t);
    }
    let a = 0.5 * g;
    let disc = vy * vy - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let (t1, t2) = ((-vy - root) / (2.0 * a), (-vy + root) / (2.0 * a));
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    if lo > 0.0 {
        Some(lo)
    } else if hi > 0.0 {
        Some(hi)
    } else {
        None
    }
}

/// Horizontal position after `t` ticks under multiplicative drag
pub fn project_x(x0: f32, vx: f32, drag: f32, t: f32) -> f32 {
    if (1.0 - drag).abs() < f32::EPSILON {
        x0 + vx * t
    } else {
        x0 + vx * (1.0 - drag.powf(t)) / (1.0 - drag)
    }
}

/// Where the projectile will be when it reaches height `y`
pub fn predict_x_at_height(ball: &Body, kin: &Kinematics, y: f32) -> Option<f32> {
    let t = time_to_height(ball.pos.y, ball.vel.y, kin.gravity, y)?;
    Some(project_x(ball.pos.x, ball.vel.x, kin.drag_x, t))
}

/// Continuous-time launch velocity covering `delta` in `t` ticks
pub fn launch_velocity(delta: Vec2, gravity: f32, t: f32) -> Vec2 {
    Vec2::new(delta.x / t, delta.y / t - 0.5 * gravity * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Paddle;
    use crate::tuning::SportTuning;
    use rand::SeedableRng;

    fn mean_tracking_error(difficulty: Difficulty, seed: u64) -> f32 {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let profile = AiProfile::for_difficulty(difficulty);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ai = AiController::new(Side::Right);
        let mut paddle = Paddle::new(1, Side::Right, Vec2::new(950.0, tuning.paddle.ground_y), tuning.paddle.shape);
        paddle.on_ground = true;
        let mut ball = Body::projectile(2, Vec2::new(760.0, 150.0), Vec2::ZERO, 17.5);
        let bounds = tuning.paddle_bounds(Side::Right);

        let mut total = 0.0;
        let mut samples = 0;
        for tick in 0..300 {
            ball.pos.y = 150.0;
            let intents = ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
            // Stand still: only tracking matters here
            let intents = Intents {
                jump: false,
                swing: false,
                ..intents
            };
            paddle.drive(&intents, &tuning.paddle, bounds);
            if tick >= 100 {
                total += (paddle.pos().x - ball.pos.x).abs();
                samples += 1;
            }
        }
        total / samples as f32
    }

    #[test]
    fn test_profile_table() {
        let easy = AiProfile::for_difficulty(Difficulty::Easy);
        assert_eq!(easy.reaction_delay, 40);
        assert_eq!(easy.aim_deviation, 100.0);
        let impossible = AiProfile::for_difficulty(Difficulty::Impossible);
        assert_eq!(impossible.reaction_delay, 0);
        assert_eq!(impossible.move_gate, 95);
    }

    #[test]
    fn test_impossible_tracks_tighter_than_easy() {
        let impossible = mean_tracking_error(Difficulty::Impossible, 11);
        let easy = mean_tracking_error(Difficulty::Easy, 11);
        assert!(impossible < 3.0, "impossible error {impossible}");
        assert!(easy > impossible);
    }

    #[test]
    fn test_never_crosses_center() {
        let tuning = SportTuning::volleyball(1100.0, 600.0);
        let profile = AiProfile::for_difficulty(Difficulty::Easy);
        let mut rng = Pcg32::seed_from_u64(99);
        let mut ai = AiController::new(Side::Left);
        let mut paddle = Paddle::new(1, Side::Left, Vec2::new(300.0, tuning.paddle.ground_y), tuning.paddle.shape);
        let bounds = tuning.paddle_bounds(Side::Left);
        for i in 0..500 {
            // Ball hugging the net on the AI's side, drifting toward it
            let ball = Body::projectile(2, Vec2::new(540.0, 200.0 + (i % 50) as f32), Vec2::new(6.0, 2.0), 30.0);
            let intents = ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
            paddle.drive(&intents, &tuning.paddle, bounds);
            assert!(paddle.pos().x <= tuning.center_x() - 50.0);
        }
    }

    #[test]
    fn test_reaction_delay_once_per_approach() {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let profile = AiProfile::for_difficulty(Difficulty::Hard);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ai = AiController::new(Side::Right);
        let paddle = Paddle::new(1, Side::Right, Vec2::new(900.0, 525.0), tuning.paddle.shape);
        let ball = Body::projectile(2, Vec2::new(700.0, 300.0), Vec2::ZERO, 17.5);

        for _ in 0..15 {
            ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
            assert_eq!(ai.phase, AiPhase::Idle);
        }
        ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
        assert_ne!(ai.phase, AiPhase::Idle);

        // Leaving the half resets the wait
        let away = Body::projectile(2, Vec2::new(300.0, 300.0), Vec2::ZERO, 17.5);
        ai.think(&profile, &tuning, &paddle, Some(&away), &mut rng);
        ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
        assert_eq!(ai.phase, AiPhase::Idle);
    }

    #[test]
    fn test_jump_sets_cooldown() {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let profile = AiProfile::for_difficulty(Difficulty::Impossible);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut ai = AiController::new(Side::Right);
        let mut paddle = Paddle::new(1, Side::Right, Vec2::new(800.0, 525.0), tuning.paddle.shape);
        paddle.on_ground = true;
        let ball = Body::projectile(2, Vec2::new(800.0, 200.0), Vec2::ZERO, 17.5);

        let mut jumped = false;
        for _ in 0..20 {
            if ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng).jump {
                jumped = true;
                break;
            }
        }
        assert!(jumped);
        assert_eq!(ai.cooldown(), 50);
        assert_eq!(ai.phase, AiPhase::ActingOnCooldown);
        let again = ai.think(&profile, &tuning, &paddle, Some(&ball), &mut rng);
        assert!(!again.jump);
    }

    #[test]
    fn test_time_to_height_smallest_positive_root() {
        // Falling from rest
        let t = time_to_height(100.0, 0.0, 0.4, 180.0).unwrap();
        assert!((t - 20.0).abs() < 1e-4);
        // Rising ball reaching a height above it: first crossing
        let t = time_to_height(300.0, -10.0, 0.5, 220.0).unwrap();
        assert!((t - 11.056).abs() < 1e-2);
        // Never gets that high
        assert!(time_to_height(300.0, -2.0, 0.5, 100.0).is_none());
    }

    #[test]
    fn test_project_x_with_drag() {
        assert_eq!(project_x(100.0, 5.0, 1.0, 10.0), 150.0);
        let x = project_x(100.0, 5.0, 0.99, 10.0);
        assert!(x < 150.0 && x > 145.0);
    }

    #[test]
    fn test_launch_velocity_reaches_target() {
        let v = launch_velocity(Vec2::new(300.0, -100.0), 0.3, 40.0);
        let y = v.y * 40.0 + 0.5 * 0.3 * 40.0 * 40.0;
        assert!((y - -100.0).abs() < 1e-3);
        assert_eq!(v.x, 7.5);
    }
}
