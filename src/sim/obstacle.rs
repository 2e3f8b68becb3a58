//! Static and relocatable obstacles
//!
//! Court walls, nets, the basket with its backboard, and randomly placed
//! free obstacles. Placement honors minimum clearances and gives up after a
//! fixed number of attempts.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{BasketTuning, CourtTuning, NetTuning, PlacementRules, WallResponse};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Whether a circle overlaps the box
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min(), self.max());
        closest.distance_squared(center) < radius * radius
    }

    /// Whether another box overlaps this one
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        d.x < self.half.x + other.half.x && d.y < self.half.y + other.half.y
    }
}

/// Court edge a wall sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Ceiling,
    Floor,
    Left,
    Right,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [
        WallSide::Ceiling,
        WallSide::Floor,
        WallSide::Left,
        WallSide::Right,
    ];

    /// Unit normal pointing into the court
    pub fn normal(self) -> Vec2 {
        match self {
            WallSide::Ceiling => Vec2::Y,
            WallSide::Floor => Vec2::NEG_Y,
            WallSide::Left => Vec2::X,
            WallSide::Right => Vec2::NEG_X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WallSide::Ceiling => "ceiling",
            WallSide::Floor => "floor",
            WallSide::Left => "left",
            WallSide::Right => "right",
        }
    }
}

/// Half-plane confining the projectile center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    /// x for side walls, y for ceiling and floor
    pub coord: f32,
    pub response: WallResponse,
}

impl Wall {
    /// Distance the point has crossed past the wall (positive when outside)
    pub fn penetration(&self, pos: Vec2) -> f32 {
        match self.side {
            WallSide::Ceiling => self.coord - pos.y,
            WallSide::Floor => pos.y - self.coord,
            WallSide::Left => self.coord - pos.x,
            WallSide::Right => pos.x - self.coord,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub center_x: f32,
    pub tuning: NetTuning,
}

impl Net {
    pub fn bounds(&self) -> Aabb {
        let t = &self.tuning;
        let half_h = (t.bottom_y - t.top_y) / 2.0;
        Aabb::new(
            Vec2::new(self.center_x, t.top_y + half_h),
            Vec2::new(t.half_width, half_h),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub center: Vec2,
    pub tuning: BasketTuning,
}

impl Basket {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.center, self.tuning.half_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall(Wall),
    Net(Net),
    Basket(Basket),
    Backboard(Aabb),
    Free(Aabb),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
}

/// Build the four court walls in confinement order
pub fn court_walls(court: &CourtTuning) -> [Wall; 4] {
    [
        Wall {
            side: WallSide::Ceiling,
            coord: court.ceiling_y,
            response: court.ceiling,
        },
        Wall {
            side: WallSide::Floor,
            coord: court.floor_y,
            response: court.floor,
        },
        Wall {
            side: WallSide::Left,
            coord: court.left_x,
            response: court.sides,
        },
        Wall {
            side: WallSide::Right,
            coord: court.right_x,
            response: court.sides,
        },
    ]
}

fn offset(rng: &mut Pcg32, range: f32) -> f32 {
    if range > 0.0 {
        rng.random_range(-range..range)
    } else {
        0.0
    }
}

/// Pick a new backboard position; the basket follows at its fixed offset.
///
/// Returns `(backboard_center, basket_center)`.
pub fn relocate_backboard(rng: &mut Pcg32, tuning: &BasketTuning, court_width: f32) -> (Vec2, Vec2) {
    let span_x = (court_width - 2.0 * tuning.relocate_margin_x).max(1.0) as u32;
    let x = rng.random_range(0..span_x.max(1)) as f32 + tuning.relocate_margin_x;
    let y = rng.random_range(0..tuning.relocate_range_y.max(1)) as f32 + tuning.relocate_min_y;
    let board = Vec2::new(x, y);
    (board, board + tuning.basket_offset)
}

/// Find a spot for a free obstacle near the basket.
///
/// `others` are the free obstacles that must keep their distance. Returns
/// `None` when every attempt violates a clearance.
pub fn place_free_obstacle(
    rng: &mut Pcg32,
    rules: &PlacementRules,
    half: Vec2,
    basket: Vec2,
    backboard: Vec2,
    others: &[Aabb],
    court: &CourtTuning,
) -> Option<Aabb> {
    let max_x = (court.width - rules.margin_x).max(rules.margin_x);
    let max_y = (court.height - rules.margin_bottom).max(rules.margin_top);

    for attempt in 0..rules.attempts {
        let candidate = Vec2::new(
            (basket.x + offset(rng, rules.spread.x)).clamp(rules.margin_x, max_x),
            (basket.y + offset(rng, rules.spread.y)).clamp(rules.margin_top, max_y),
        );

        let clear = candidate.distance(basket) >= rules.basket_clearance
            && candidate.distance(backboard) >= rules.backboard_clearance
            && others
                .iter()
                .all(|o| candidate.distance(o.center) >= rules.obstacle_clearance);

        if clear {
            log::debug!("Placed free obstacle at {candidate} after {} attempts", attempt + 1);
            return Some(Aabb::new(candidate, half));
        }
    }

    log::debug!("No free spot for obstacle after {} attempts", rules.attempts);
    None
}
