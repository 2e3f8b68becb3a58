//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles and paddles by entity ID)
//! - No rendering, input or audio dependencies

pub mod ai;
pub mod body;
pub mod collision;
pub mod integrator;
pub mod obstacle;
pub mod scoring;
pub mod state;
pub mod tick;

pub use ai::{AiController, AiPhase, AiProfile};
pub use body::{Body, BodyKind, Paddle, Shape, Side};
pub use collision::{ContactEvent, ContactKind, ContactTarget};
pub use obstacle::{Aabb, Basket, Net, Obstacle, ObstacleKind, Wall, WallSide};
pub use state::{Announcement, GameState, MatchEvent, RoundState, ScoreUpdate};
pub use tick::{Intents, MAX_SHOT_DRAG, Steer, TickInput, shot_velocity, tick};
