//! Match state and round state machine
//!
//! Everything that changes during a match lives here: the projectile, the
//! paddles, the obstacle layout, scores and the round state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AiController, AiProfile};
use super::body::{Body, Paddle, Side};
use super::obstacle::{
    Aabb, Basket, Net, Obstacle, ObstacleKind, court_walls, place_free_obstacle, relocate_backboard,
};
use super::tick::Intents;
use crate::settings::{ConfigError, MatchSettings, Sport};
use crate::tuning::{GoalRule, SportTuning};

/// Round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// A projectile is spawned on the next tick
    Serving,
    Rallying,
    /// Point scored, physics still running, judge disarmed
    PointPausing,
    /// Terminal
    MatchOver,
}

/// Score snapshot handed to score listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// Side that just scored
    pub side: Side,
    pub left: u32,
    pub right: u32,
}

/// Match-level events, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Serve { side: Side },
    PointScored(ScoreUpdate),
    /// `winner` is `None` on a tied timed match
    MatchOver { winner: Option<Side> },
}

/// Transient on-screen message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub ticks_left: u32,
}

/// Complete match state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: MatchSettings,
    pub tuning: SportTuning,
    pub profile: AiProfile,
    pub round: RoundState,
    /// Side serving next
    pub serving: Side,
    /// Indexed by `Side::index`
    pub scores: [u32; 2],
    /// Ticks left in `PointPausing`
    pub countdown: u32,
    /// Set once per serve when a point is awarded
    pub point_awarded: bool,
    pub opening_served: bool,
    pub time_ticks: u64,
    /// Remaining clock for timed sports
    pub time_left: Option<u64>,
    pub projectile: Option<Body>,
    pub paddles: Vec<Paddle>,
    /// Sorted by id
    pub obstacles: Vec<Obstacle>,
    pub ai: [Option<AiController>; 2],
    /// Intents the AI produced last tick, applied on the next one
    pub pending_ai: [Intents; 2],
    pub announcement: Option<Announcement>,
    pub events: Vec<MatchEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Build a match with the sport's default tuning for the court size
    pub fn new(settings: MatchSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let tuning = SportTuning::for_sport(settings.sport, settings.court_width, settings.court_height);
        Self::with_tuning(settings, tuning)
    }

    /// Build a match with explicit tuning (e.g. loaded from JSON)
    pub fn with_tuning(settings: MatchSettings, tuning: SportTuning) -> Result<Self, ConfigError> {
        settings.validate()?;
        let profile = AiProfile::for_difficulty(settings.difficulty);
        let serving = tuning.serve.fixed_server.unwrap_or(Side::Left);

        let mut state = Self {
            profile,
            round: RoundState::Serving,
            serving,
            scores: [0, 0],
            countdown: 0,
            point_awarded: false,
            opening_served: false,
            time_ticks: 0,
            time_left: tuning.rules.time_limit_ticks,
            projectile: None,
            paddles: Vec::new(),
            obstacles: Vec::new(),
            ai: [None, None],
            pending_ai: [Intents::default(), Intents::default()],
            announcement: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
            next_id: 1,
            settings,
            tuning,
        };
        state.build_layout();

        log::info!(
            "Match configured: {} on {}x{}, difficulty {}, seed {}",
            state.settings.sport.as_str(),
            state.settings.court_width,
            state.settings.court_height,
            state.settings.difficulty.as_str(),
            state.settings.seed
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn build_layout(&mut self) {
        for wall in court_walls(&self.tuning.court) {
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Wall(wall),
            });
        }

        if let Some(net) = self.tuning.net {
            let id = self.next_entity_id();
            let center_x = self.tuning.center_x();
            self.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Net(Net { center_x, tuning: net }),
            });
        }

        if let Some(basket) = self.tuning.basket {
            let board = basket.backboard_start;
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Backboard(Aabb::new(board, basket.backboard_half)),
            });
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::Basket(Basket {
                    center: board + basket.basket_offset,
                    tuning: basket,
                }),
            });
        }

        let pt = self.tuning.paddle.clone();
        for side in pt.sides {
            let id = self.next_entity_id();
            let pos = Vec2::new(pt.start_x[side.index()], pt.start_y);
            self.paddles.push(Paddle::new(id, side, pos, pt.shape));
            if self.settings.is_cpu(side) {
                self.ai[side.index()] = Some(AiController::new(side));
            }
        }
    }

    pub fn sport(&self) -> Sport {
        self.settings.sport
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub fn paddle(&self, side: Side) -> Option<&Paddle> {
        self.paddles.iter().find(|p| p.side == side)
    }

    /// Side credited with baskets
    pub fn shooter(&self) -> Side {
        self.tuning.serve.fixed_server.unwrap_or(Side::Left)
    }

    pub fn basket(&self) -> Option<&Basket> {
        self.obstacles.iter().find_map(|o| match &o.kind {
            ObstacleKind::Basket(b) => Some(b),
            _ => None,
        })
    }

    pub fn backboard(&self) -> Option<&Aabb> {
        self.obstacles.iter().find_map(|o| match &o.kind {
            ObstacleKind::Backboard(b) => Some(b),
            _ => None,
        })
    }

    pub fn free_obstacles(&self) -> impl Iterator<Item = &Aabb> {
        self.obstacles.iter().filter_map(|o| match &o.kind {
            ObstacleKind::Free(b) => Some(b),
            _ => None,
        })
    }

    pub fn is_over(&self) -> bool {
        self.round == RoundState::MatchOver
    }

    /// Take the match events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    fn announce(&mut self, text: String, ticks: u32) {
        self.announcement = Some(Announcement { text, ticks_left: ticks });
    }

    pub(crate) fn tick_announcement(&mut self) {
        if let Some(a) = self.announcement.as_mut() {
            a.ticks_left = a.ticks_left.saturating_sub(1);
            if a.ticks_left == 0 {
                self.announcement = None;
            }
        }
    }

    /// Replace the projectile with a fresh serve and start the rally
    pub fn spawn_serve(&mut self) {
        let serve = self.tuning.serve;
        let side = self.serving;

        let (pos, vel) = if !self.opening_served {
            self.opening_served = true;
            let mut vel = serve.opening_vel;
            if serve.opening_random_dir && self.rng.random_bool(0.5) {
                vel.x = -vel.x;
            }
            (serve.opening_pos, vel)
        } else {
            let vel = Vec2::new(serve.velocity.x * side.toward_opponent(), serve.velocity.y);
            (serve.spots[side.index()], vel)
        };

        let id = self.next_entity_id();
        self.projectile = Some(Body::projectile(id, pos, vel, self.tuning.projectile_radius));
        self.round = RoundState::Rallying;
        self.point_awarded = false;
        for ai in self.ai.iter_mut().flatten() {
            ai.reset();
        }

        self.events.push(MatchEvent::Serve { side });
        let ticks = self.tuning.rules.serve_message_ticks;
        self.announce(format!("{} side serving!", capitalized(side)), ticks);
        log::info!("{} side serves from {pos}", side.as_str());
    }

    /// Credit a point to `scorer`. Ignored if this serve already produced one.
    pub fn award_point(&mut self, scorer: Side) {
        if self.point_awarded || self.round == RoundState::MatchOver {
            return;
        }
        self.point_awarded = true;

        let rules = self.tuning.rules;
        let before = self.scores[scorer.index()];
        self.scores[scorer.index()] += rules.points_per_score;
        let after = self.scores[scorer.index()];
        self.serving = self.tuning.serve.fixed_server.unwrap_or(scorer.opponent());

        let update = ScoreUpdate {
            side: scorer,
            left: self.scores[0],
            right: self.scores[1],
        };
        self.events.push(MatchEvent::PointScored(update));
        log::info!(
            "{} side scores ({} - {})",
            scorer.as_str(),
            update.left,
            update.right
        );

        if rules.goal == GoalRule::Basket {
            self.relocate_basket(before, after);
        }

        if rules.win_score.is_some_and(|target| after >= target) {
            self.finish();
            return;
        }

        self.announce(
            format!("{} side scores!", capitalized(scorer)),
            rules.point_message_ticks,
        );
        self.round = RoundState::PointPausing;
        self.countdown = rules.point_pause_ticks;
    }

    /// End the match; the higher score wins
    pub fn finish(&mut self) {
        if self.round == RoundState::MatchOver {
            return;
        }
        let winner = match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        };
        self.round = RoundState::MatchOver;
        self.events.push(MatchEvent::MatchOver { winner });

        let text = match winner {
            Some(side) => format!("{} side wins!", capitalized(side)),
            None => "It's a draw!".to_string(),
        };
        self.announce(text, self.tuning.rules.point_message_ticks);
        log::info!(
            "Match over: {} - {} ({})",
            self.scores[0],
            self.scores[1],
            winner.map_or("draw", |s| s.as_str())
        );
    }

    /// Move the backboard and basket, add a free obstacle on each milestone
    /// crossed, and reshuffle every free obstacle.
    fn relocate_basket(&mut self, before: u32, after: u32) {
        let Some(tuning) = self.tuning.basket else {
            return;
        };
        let court = self.tuning.court;
        let (board, hoop) = relocate_backboard(&mut self.rng, &tuning, court.width);
        for obstacle in self.obstacles.iter_mut() {
            match &mut obstacle.kind {
                ObstacleKind::Backboard(rect) => rect.center = board,
                ObstacleKind::Basket(basket) => basket.center = hoop,
                _ => {}
            }
        }
        log::debug!("Basket moved to {hoop}");

        let milestone = tuning.obstacle_milestone;
        if milestone > 0 {
            let added = after / milestone - before / milestone;
            for _ in 0..added {
                let others: Vec<Aabb> = self.free_obstacles().copied().collect();
                let placed = place_free_obstacle(
                    &mut self.rng,
                    &tuning.placement,
                    tuning.free_obstacle_half,
                    hoop,
                    board,
                    &others,
                    &court,
                );
                if let Some(rect) = placed {
                    let id = self.next_entity_id();
                    self.obstacles.push(Obstacle {
                        id,
                        kind: ObstacleKind::Free(rect),
                    });
                    log::info!("New obstacle at {}", rect.center);
                }
            }
        }

        // Reshuffle existing free obstacles one at a time against the others
        let free_indices: Vec<usize> = self
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| matches!(o.kind, ObstacleKind::Free(_)))
            .map(|(i, _)| i)
            .collect();
        for &i in &free_indices {
            let others: Vec<Aabb> = free_indices
                .iter()
                .filter(|&&j| j != i)
                .filter_map(|&j| match &self.obstacles[j].kind {
                    ObstacleKind::Free(rect) => Some(*rect),
                    _ => None,
                })
                .collect();
            let placed = place_free_obstacle(
                &mut self.rng,
                &tuning.placement,
                tuning.free_obstacle_half,
                hoop,
                board,
                &others,
                &court,
            );
            if let (Some(rect), ObstacleKind::Free(current)) = (placed, &mut self.obstacles[i].kind) {
                *current = rect;
            }
        }
    }

    /// Let every CPU side observe the world and queue intents for next tick
    pub(crate) fn run_ai(&mut self) {
        for side in Side::BOTH {
            let idx = side.index();
            let Some(ai) = self.ai[idx].as_mut() else {
                continue;
            };
            let Some(paddle) = self.paddles.iter().find(|p| p.side == side) else {
                continue;
            };
            self.pending_ai[idx] = ai.think(
                &self.profile,
                &self.tuning,
                paddle,
                self.projectile.as_ref(),
                &mut self.rng,
            );
        }
    }
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Left => "Left",
        Side::Right => "Right",
    }
}
