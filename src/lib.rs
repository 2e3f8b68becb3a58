//! Court Sports - basketball, badminton and volleyball on one engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrator, collisions, scoring, AI, rounds)
//! - `tuning`: Data-driven per-sport constants
//! - `settings`: Match configuration
//! - `audio`: Sound capability driven by contact events
//! - `session`: Embedding surface (configure / tick / on_score)

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use settings::{ConfigError, Difficulty, MatchSettings, Sport};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Length of one tick in tick units
    pub const TICK: f32 = 1.0;

    /// Default court dimensions (pixels)
    pub const DEFAULT_COURT_WIDTH: f32 = 1100.0;
    pub const DEFAULT_COURT_HEIGHT: f32 = 600.0;
    /// Smallest court the layouts still fit in
    pub const MIN_COURT_WIDTH: f32 = 400.0;
    pub const MIN_COURT_HEIGHT: f32 = 300.0;

    /// Wall contacts slower than this are not reported as events
    pub const MIN_EVENT_SPEED: f32 = 1.0;

    /// Hard velocity limits applied every tick (pixels per tick)
    pub const MAX_SPEED_X: f32 = 40.0;
    pub const MAX_FALL_SPEED: f32 = 40.0;
}

/// Normalize a vector, substituting a unit length for zero-length input.
///
/// Falls back to `fallback` when the vector has no direction at all.
#[inline]
pub fn safe_normalize(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    let len = if len == 0.0 { 1.0 } else { len };
    let n = v / len;
    if n == Vec2::ZERO { fallback } else { n }
}

/// Truncate both components toward zero (integer pixel deltas)
#[inline]
pub fn truncate(v: Vec2) -> Vec2 {
    Vec2::new(v.x.trunc(), v.y.trunc())
}

/// Zero out components whose magnitude is below `threshold`
#[inline]
pub fn snap_to_rest(v: Vec2, threshold: f32) -> Vec2 {
    Vec2::new(
        if v.x.abs() < threshold { 0.0 } else { v.x },
        if v.y.abs() < threshold { 0.0 } else { v.y },
    )
}
