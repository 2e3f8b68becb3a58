//! Data-driven per-sport tuning
//!
//! Every constant that differs between basketball, badminton and volleyball
//! lives here as plain data. Layouts are derived from the court size; any
//! table can be overridden from JSON.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{ConfigError, Sport};
use crate::sim::{Shape, Side};

/// Projectile motion constants (per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Downward acceleration added to vy every tick
    pub gravity: f32,
    /// Multiplicative drag on vx
    pub drag_x: f32,
    /// Multiplicative drag on vy
    pub drag_y: f32,
    /// Upward speed cap (vy is never below -max_ascent after integration)
    pub max_ascent: f32,
    /// Downward speed cap
    pub max_fall: f32,
    /// Horizontal speed cap
    pub max_speed_x: f32,
}

/// How a court wall treats the velocity component along its normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallMode {
    /// Bounce back with damping
    Reflect,
    /// Kill the normal component
    Absorb,
    /// Kill all motion
    Stop,
}

/// Residual speed snapping after a wall bounce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RestRule {
    None,
    /// Zero the normal component when it falls below the threshold
    NormalBelow(f32),
    /// Zero both components when both fall below the threshold
    BothBelow(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallResponse {
    pub mode: WallMode,
    /// Applied to the normal component on reflection
    pub damping: f32,
    /// Applied to the tangential component on any contact
    pub tangent_damping: f32,
    pub rest: RestRule,
}

impl WallResponse {
    pub fn reflect(damping: f32, tangent_damping: f32, rest: RestRule) -> Self {
        Self {
            mode: WallMode::Reflect,
            damping,
            tangent_damping,
            rest,
        }
    }

    pub fn absorb() -> Self {
        Self {
            mode: WallMode::Absorb,
            damping: 0.0,
            tangent_damping: 1.0,
            rest: RestRule::None,
        }
    }

    pub fn stop() -> Self {
        Self {
            mode: WallMode::Stop,
            damping: 0.0,
            tangent_damping: 0.0,
            rest: RestRule::None,
        }
    }
}

/// Court extents for the projectile center, plus wall responses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtTuning {
    pub width: f32,
    pub height: f32,
    pub ceiling_y: f32,
    pub floor_y: f32,
    pub left_x: f32,
    pub right_x: f32,
    pub ceiling: WallResponse,
    pub floor: WallResponse,
    pub sides: WallResponse,
}

impl CourtTuning {
    /// Center line (integer pixel column)
    pub fn center_x(&self) -> f32 {
        (self.width / 2.0).floor()
    }
}

/// Response off rectangular solids (backboard, free obstacles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceTuning {
    pub damping: f32,
    pub rest_threshold: f32,
    /// Non-zero components are raised to at least this speed
    pub min_rebound: f32,
    /// Minimum push-out distance
    pub push_min: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetTuning {
    pub half_width: f32,
    pub top_y: f32,
    pub bottom_y: f32,
    pub top_thickness: f32,
    pub pole_thickness: f32,
    /// Pole bounce damping
    pub damping: f32,
    /// Top band bounce damping
    pub top_damping: f32,
    /// Gap left between body and pole after a bounce
    pub clearance: f32,
    /// Gap left above the top band
    pub top_clearance: f32,
    /// Net contacts within this many ticks of the last one are ignored
    pub guard_ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRules {
    pub attempts: u32,
    /// Random offset range around the basket
    pub spread: Vec2,
    pub margin_x: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub basket_clearance: f32,
    pub backboard_clearance: f32,
    pub obstacle_clearance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasketTuning {
    /// Basket sprite half extents (collision box)
    pub half_size: Vec2,
    pub rim_half_width: f32,
    /// Scoring band, measured down from the basket center
    pub band_top: f32,
    pub band_bottom: f32,
    /// vy must exceed -down_tolerance inside the band
    pub down_tolerance: f32,
    /// Balls higher than this above the basket and falling pass the collar
    pub pass_through_dy: f32,
    /// Horizontal distance at which the collar bounces sideways
    pub side_dx: f32,
    pub push_min: f32,
    pub damping: f32,
    pub rest_threshold: f32,
    pub backboard_half: Vec2,
    /// Basket position relative to the backboard center
    pub basket_offset: Vec2,
    pub backboard_start: Vec2,
    /// Backboard relocation: x in [margin, width - margin), y in [min_y, min_y + range_y)
    pub relocate_margin_x: f32,
    pub relocate_min_y: f32,
    pub relocate_range_y: u32,
    /// Free obstacle added at this score and every multiple of it
    pub obstacle_milestone: u32,
    pub free_obstacle_half: Vec2,
    pub placement: PlacementRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandStyle {
    pub damping: f32,
    /// Fraction of the hand velocity transferred to the ball
    pub transfer: Vec2,
    pub rest_threshold: f32,
    /// Swat impulse while the hand is airborne
    pub swat_power: f32,
    pub swat_lift: f32,
    pub recoil: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacketStyle {
    pub smash_speed: f32,
    /// Vertical offset separating the smash / flat / lift zones
    pub smash_band: f32,
    pub smash_down_boost: f32,
    pub smash_down_vmod: f32,
    pub lift_boost: f32,
    pub lift_vmod: f32,
    pub flat_boost: f32,
    pub flat_lift: f32,
    pub distance_multiplier: f32,
    pub smash_nudge: f32,
    pub idle_band: f32,
    pub idle_speed: f32,
    pub idle_lift_top: f32,
    pub idle_lift_mid: f32,
    pub idle_lift_bottom: f32,
    pub idle_nudge: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolleyStyle {
    pub spike_height: f32,
    pub spike_reach: f32,
    pub spike_speed: f32,
    pub spike_jitter: u32,
    pub spike_angle_deg: f32,
    pub hit_bonus: f32,
    pub hit_cap: f32,
    pub angle_bias: f32,
    pub nudge: f32,
}

/// Per-sport hit-surface behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitStyle {
    Hand(HandStyle),
    Racket(RacketStyle),
    Volley(VolleyStyle),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleTuning {
    pub shape: Shape,
    /// Sides that field a paddle
    pub sides: Vec<Side>,
    /// Start x per side (indexed by `Side::index`)
    pub start_x: [f32; 2],
    pub start_y: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    /// `Some` keeps horizontal momentum with this friction; `None` steps directly
    pub friction: Option<f32>,
    pub fast_fall: f32,
    pub ground_y: f32,
    /// Ceiling y and the factor applied to the rebound speed
    pub ceiling: Option<(f32, f32)>,
    pub edge_margin: f32,
    /// Closest a paddle may get to the center line
    pub net_margin: Option<f32>,
    pub swing_ticks: u32,
    pub style: HitStyle,
}

impl PaddleTuning {
    /// Ticks to reach the top of a jump and the height gained
    pub fn jump_apex(&self) -> (u32, f32) {
        if self.gravity <= 0.0 {
            return (0, 0.0);
        }
        let mut vy = -self.jump_speed;
        let mut rise = 0.0;
        let mut ticks = 0;
        loop {
            vy += self.gravity;
            if vy >= 0.0 {
                break;
            }
            rise -= vy.trunc();
            ticks += 1;
        }
        (ticks, rise)
    }
}

/// How the AI picks its horizontal target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackingMode {
    /// Follow the projectile's current x
    Direct,
    /// Predict where the projectile reaches `contact_height` above the paddle
    Intercept { contact_height: f32 },
}

/// Per-sport condition for a CPU action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionTrigger {
    /// Projectile within a box around the paddle
    Proximity { reach_x: f32, reach_y: f32 },
    /// Projectile higher than the paddle by at least `margin`
    Overhead { margin: f32 },
    /// Falling projectile expected within `reach` above the paddle after `ticks`
    Lookahead { ticks: f32, reach: f32 },
    /// Projectile arrives at jump apex height within `window` ticks of the apex
    ApexTiming { window: f32, max_angle_deg: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiTuning {
    pub tracking: TrackingMode,
    /// Distance to target at which the paddle stops
    pub deadband: f32,
    /// Only react while the projectile is on the AI's half
    pub guards_half: bool,
    pub jump: ActionTrigger,
    pub swing: Option<ActionTrigger>,
    pub action_cooldown: u32,
    /// Low-pass factor on the target (1.0 = unfiltered)
    pub smoothing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServeTuning {
    pub opening_pos: Vec2,
    pub opening_vel: Vec2,
    /// Opening serve picks a random horizontal direction
    pub opening_random_dir: bool,
    /// Serve spot per side
    pub spots: [Vec2; 2],
    /// Serve velocity from the left side (mirrored for the right)
    pub velocity: Vec2,
    /// Side that always serves, if the sport has one
    pub fixed_server: Option<Side>,
}

/// What counts as a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoalRule {
    /// Ball through the basket; the shooter (left side) scores
    Basket,
    /// Projectile touches the ground line; the other half scores
    FloorOut { ground_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RulesTuning {
    pub goal: GoalRule,
    pub points_per_score: u32,
    pub win_score: Option<u32>,
    pub time_limit_ticks: Option<u64>,
    pub point_pause_ticks: u32,
    pub serve_message_ticks: u32,
    pub point_message_ticks: u32,
}

/// Complete tuning for one sport on one court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportTuning {
    pub sport: Sport,
    pub court: CourtTuning,
    pub kinematics: Kinematics,
    pub projectile_radius: f32,
    pub bounce: BounceTuning,
    pub net: Option<NetTuning>,
    pub basket: Option<BasketTuning>,
    pub paddle: PaddleTuning,
    pub ai: AiTuning,
    pub serve: ServeTuning,
    pub rules: RulesTuning,
}

const RECT_BOUNCE: BounceTuning = BounceTuning {
    damping: 0.7,
    rest_threshold: 0.5,
    min_rebound: 2.0,
    push_min: 4.0,
};

impl SportTuning {
    pub fn for_sport(sport: Sport, width: f32, height: f32) -> Self {
        match sport {
            Sport::Basketball => Self::basketball(width, height),
            Sport::Badminton => Self::badminton(width, height),
            Sport::Volleyball => Self::volleyball(width, height),
        }
    }

    pub fn basketball(w: f32, h: f32) -> Self {
        let floor_y = h - 45.0;
        let radius = 21.0;
        let basket_offset = Vec2::new(-45.0, 51.0);
        let band_bottom = 40.0;
        // Lowest backboard that keeps the whole scoring band above the floor
        let board_max_y = (floor_y - radius - band_bottom - basket_offset.y).min(350.0);
        let board_min_y = board_max_y.min(300.0) / 2.0;

        Self {
            sport: Sport::Basketball,
            court: CourtTuning {
                width: w,
                height: h,
                ceiling_y: 20.0,
                floor_y,
                left_x: 20.0,
                right_x: w - 20.0,
                ceiling: WallResponse::reflect(0.7, 0.7, RestRule::None),
                floor: WallResponse::reflect(0.7, 0.7, RestRule::BothBelow(1.0)),
                sides: WallResponse::reflect(0.7, 1.0, RestRule::None),
            },
            kinematics: Kinematics {
                gravity: 0.3,
                drag_x: 0.98,
                drag_y: 1.0,
                max_ascent: 20.0,
                max_fall: MAX_FALL_SPEED,
                max_speed_x: MAX_SPEED_X,
            },
            projectile_radius: radius,
            bounce: RECT_BOUNCE,
            net: None,
            basket: Some(BasketTuning {
                half_size: Vec2::new(40.0, 30.0),
                rim_half_width: 30.0,
                band_top: 5.0,
                band_bottom,
                down_tolerance: 0.5,
                pass_through_dy: 20.0,
                side_dx: 25.0,
                push_min: 3.0,
                damping: 0.7,
                rest_threshold: 0.3,
                backboard_half: Vec2::new(7.5, 70.0),
                basket_offset,
                backboard_start: Vec2::new(w - 20.0, board_max_y.min(200.0)),
                relocate_margin_x: 75.0,
                relocate_min_y: board_min_y,
                relocate_range_y: (board_max_y - board_min_y).max(1.0) as u32,
                obstacle_milestone: 10,
                free_obstacle_half: Vec2::new(20.0, 42.5),
                placement: PlacementRules {
                    attempts: 50,
                    spread: Vec2::new(100.0, 75.0),
                    margin_x: 50.0,
                    margin_top: 50.0,
                    margin_bottom: 100.0,
                    basket_clearance: 100.0,
                    backboard_clearance: 100.0,
                    obstacle_clearance: 120.0,
                },
            }),
            paddle: PaddleTuning {
                shape: Shape::Circle { radius: 14.0 },
                sides: vec![Side::Right],
                start_x: [400.0, 400.0],
                start_y: h - 50.0,
                move_speed: 7.0,
                jump_speed: 27.0,
                gravity: 0.8,
                friction: Some(0.9),
                fast_fall: 1.0,
                ground_y: h - 45.0,
                ceiling: Some((25.0, 0.5)),
                edge_margin: 25.0,
                net_margin: None,
                swing_ticks: 0,
                style: HitStyle::Hand(HandStyle {
                    damping: 0.7,
                    transfer: Vec2::new(0.5, 0.3),
                    rest_threshold: 0.3,
                    swat_power: 20.0,
                    swat_lift: 0.6,
                    recoil: 2.0,
                }),
            },
            ai: AiTuning {
                tracking: TrackingMode::Direct,
                deadband: 10.0,
                guards_half: false,
                jump: ActionTrigger::Lookahead {
                    ticks: 5.0,
                    reach: 80.0,
                },
                swing: None,
                action_cooldown: 0,
                smoothing: 1.0,
            },
            serve: ServeTuning {
                opening_pos: Vec2::new(100.0, h - 100.0),
                opening_vel: Vec2::ZERO,
                opening_random_dir: false,
                spots: [Vec2::new(100.0, h - 100.0), Vec2::new(100.0, h - 100.0)],
                velocity: Vec2::ZERO,
                fixed_server: Some(Side::Left),
            },
            rules: RulesTuning {
                goal: GoalRule::Basket,
                points_per_score: 2,
                win_score: None,
                time_limit_ticks: Some(120 * TICK_RATE as u64),
                point_pause_ticks: 45,
                serve_message_ticks: 100,
                point_message_ticks: 70,
            },
        }
    }

    pub fn badminton(w: f32, h: f32) -> Self {
        let serve_y = h / 2.0 - 100.0;
        let spot_x = w / 5.5;
        Self {
            sport: Sport::Badminton,
            court: CourtTuning {
                width: w,
                height: h,
                ceiling_y: 57.0,
                floor_y: h - 35.0,
                left_x: 0.0,
                right_x: w,
                ceiling: WallResponse::absorb(),
                floor: WallResponse::stop(),
                sides: WallResponse::reflect(0.6, 1.0, RestRule::None),
            },
            kinematics: Kinematics {
                gravity: 0.3,
                drag_x: 0.985,
                drag_y: 0.985,
                max_ascent: 12.0,
                max_fall: MAX_FALL_SPEED,
                max_speed_x: MAX_SPEED_X,
            },
            projectile_radius: 17.5,
            bounce: RECT_BOUNCE,
            net: Some(NetTuning {
                half_width: 10.0,
                top_y: h - 295.0,
                bottom_y: h - 15.0,
                top_thickness: 20.0,
                pole_thickness: 10.0,
                damping: 0.6,
                top_damping: 0.9,
                clearance: 2.0,
                top_clearance: 3.0,
                guard_ticks: 5,
            }),
            basket: None,
            paddle: PaddleTuning {
                shape: Shape::Box {
                    half: Vec2::new(40.0, 60.0),
                },
                sides: vec![Side::Left, Side::Right],
                start_x: [spot_x, w - spot_x],
                start_y: h - 100.0,
                move_speed: 10.0,
                jump_speed: 25.0,
                gravity: 1.0,
                friction: None,
                fast_fall: 3.0,
                ground_y: h - 75.0,
                ceiling: None,
                edge_margin: 40.0,
                net_margin: Some(50.0),
                swing_ticks: 30,
                style: HitStyle::Racket(RacketStyle {
                    smash_speed: 15.0,
                    smash_band: 20.0,
                    smash_down_boost: 1.2,
                    smash_down_vmod: 1.8,
                    lift_boost: 1.3,
                    lift_vmod: 0.5,
                    flat_boost: 1.1,
                    flat_lift: 8.0,
                    distance_multiplier: 1.5,
                    smash_nudge: 25.0,
                    idle_band: 15.0,
                    idle_speed: 10.0,
                    idle_lift_top: 10.0,
                    idle_lift_mid: 8.0,
                    idle_lift_bottom: 5.0,
                    idle_nudge: Vec2::new(15.0, 10.0),
                }),
            },
            ai: AiTuning {
                tracking: TrackingMode::Direct,
                deadband: 0.0,
                guards_half: true,
                jump: ActionTrigger::Overhead { margin: 30.0 },
                swing: Some(ActionTrigger::Proximity {
                    reach_x: 80.0,
                    reach_y: 80.0,
                }),
                action_cooldown: 50,
                smoothing: 1.0,
            },
            serve: ServeTuning {
                opening_pos: Vec2::new((w / 2.0).floor(), serve_y),
                opening_vel: Vec2::new(5.0, -8.0),
                opening_random_dir: true,
                spots: [Vec2::new(spot_x, serve_y), Vec2::new(w - spot_x, serve_y)],
                velocity: Vec2::new(4.0, -6.0),
                fixed_server: None,
            },
            rules: RulesTuning {
                goal: GoalRule::FloorOut { ground_y: h - 44.0 },
                points_per_score: 1,
                win_score: Some(21),
                time_limit_ticks: None,
                point_pause_ticks: 100,
                serve_message_ticks: 100,
                point_message_ticks: 70,
            },
        }
    }

    pub fn volleyball(w: f32, h: f32) -> Self {
        let serve_y = h / 2.0 - 100.0;
        let spot_x = w / 5.5;
        Self {
            sport: Sport::Volleyball,
            court: CourtTuning {
                width: w,
                height: h,
                ceiling_y: 80.0,
                floor_y: h - 57.0,
                left_x: 0.0,
                right_x: w,
                ceiling: WallResponse::absorb(),
                floor: WallResponse::reflect(0.7, 1.0, RestRule::NormalBelow(1.0)),
                sides: WallResponse::reflect(0.7, 1.0, RestRule::None),
            },
            kinematics: Kinematics {
                gravity: 0.4,
                drag_x: 0.99,
                drag_y: 1.0,
                max_ascent: 15.0,
                max_fall: MAX_FALL_SPEED,
                max_speed_x: MAX_SPEED_X,
            },
            projectile_radius: 30.0,
            bounce: RECT_BOUNCE,
            net: Some(NetTuning {
                half_width: 10.0,
                top_y: h - 337.0,
                bottom_y: h - 22.0,
                top_thickness: 20.0,
                pole_thickness: 10.0,
                damping: 0.7,
                top_damping: 0.9,
                clearance: 2.0,
                top_clearance: 3.0,
                guard_ticks: 5,
            }),
            basket: None,
            paddle: PaddleTuning {
                shape: Shape::Box {
                    half: Vec2::new(32.5, 32.5),
                },
                sides: vec![Side::Left, Side::Right],
                start_x: [spot_x, w - spot_x],
                start_y: h - 100.0,
                move_speed: 10.0,
                jump_speed: 27.0,
                gravity: 1.0,
                friction: None,
                fast_fall: 3.0,
                ground_y: h - 53.0,
                ceiling: None,
                edge_margin: 32.5,
                net_margin: Some(50.0),
                swing_ticks: 0,
                style: HitStyle::Volley(VolleyStyle {
                    spike_height: 60.0,
                    spike_reach: 80.0,
                    spike_speed: 25.0,
                    spike_jitter: 10,
                    spike_angle_deg: 60.0,
                    hit_bonus: 5.0,
                    hit_cap: 20.0,
                    angle_bias: PI / 12.0,
                    nudge: 10.0,
                }),
            },
            ai: AiTuning {
                tracking: TrackingMode::Intercept {
                    contact_height: 45.0,
                },
                deadband: 4.0,
                guards_half: true,
                jump: ActionTrigger::ApexTiming {
                    window: 6.0,
                    max_angle_deg: 70.0,
                },
                swing: None,
                action_cooldown: 50,
                smoothing: 0.3,
            },
            serve: ServeTuning {
                opening_pos: Vec2::new((w / 2.0).floor(), serve_y),
                opening_vel: Vec2::ZERO,
                opening_random_dir: false,
                spots: [Vec2::new(spot_x, serve_y), Vec2::new(w - spot_x, serve_y)],
                velocity: Vec2::new(4.0, -6.0),
                fixed_server: None,
            },
            rules: RulesTuning {
                goal: GoalRule::FloorOut { ground_y: h - 57.0 },
                points_per_score: 1,
                win_score: Some(25),
                time_limit_ticks: None,
                point_pause_ticks: 100,
                serve_message_ticks: 100,
                point_message_ticks: 70,
            },
        }
    }

    /// Load a full tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn center_x(&self) -> f32 {
        self.court.center_x()
    }

    /// Leftmost and rightmost x a paddle on `side` may occupy
    pub fn paddle_bounds(&self, side: Side) -> (f32, f32) {
        let margin = self.paddle.edge_margin;
        let (mut min_x, mut max_x) = (margin, self.court.width - margin);
        if let Some(net_margin) = self.paddle.net_margin {
            let center = self.center_x();
            match side {
                Side::Left => max_x = center - net_margin,
                Side::Right => min_x = center + net_margin,
            }
        }
        (min_x, max_x)
    }
}
