//! Collision detection and response
//!
//! One pass per projectile per tick. Every overlapping obstacle and paddle is
//! collected as a candidate, candidates are ordered by priority (goal first,
//! then solids, then paddles) and resolved in that order until one responds.
//! The court walls then confine the projectile.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Paddle, Shape, Side};
use super::obstacle::{Aabb, Basket, Net, Obstacle, ObstacleKind, Wall, WallSide};
use super::scoring::basket_scores;
use crate::consts::MIN_EVENT_SPEED;
use crate::tuning::{
    BounceTuning, HandStyle, HitStyle, RacketStyle, RestRule, SportTuning, VolleyStyle, WallMode,
};
use crate::{safe_normalize, snap_to_rest};

/// What the projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTarget {
    Obstacle(u32),
    Paddle(Side),
    Wall(WallSide),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Bounce,
    /// Basketball hand deflection
    Block,
    Hit,
    Smash,
    NetTouch,
    Score,
}

/// A resolved contact, reported to the caller for sound and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub body_id: u32,
    pub target: ContactTarget,
    /// Unit normal pointing away from the surface
    pub normal: Vec2,
    pub impact_speed: f32,
    pub kind: ContactKind,
}

/// An overlapping thing the projectile may respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Goal(usize),
    Solid(usize),
    Paddle(usize),
}

impl Candidate {
    fn priority(self) -> u8 {
        match self {
            Candidate::Goal(_) => 0,
            Candidate::Solid(_) => 1,
            Candidate::Paddle(_) => 2,
        }
    }
}

/// Resolve the projectile against everything it overlaps this tick.
///
/// `score_armed` enables the basket goal candidate; `now` is the current
/// tick for the net re-entry guard.
pub fn resolve(
    body: &mut Body,
    obstacles: &[Obstacle],
    paddles: &mut [Paddle],
    tuning: &SportTuning,
    score_armed: bool,
    now: u64,
    rng: &mut Pcg32,
) -> Vec<ContactEvent> {
    let radius = body.radius();
    let mut candidates = Vec::new();

    for (i, obstacle) in obstacles.iter().enumerate() {
        match &obstacle.kind {
            ObstacleKind::Basket(basket) => {
                if score_armed && basket_scores(body, basket) {
                    candidates.push(Candidate::Goal(i));
                }
                if basket.bounds().overlaps_circle(body.pos, radius) {
                    candidates.push(Candidate::Solid(i));
                }
            }
            ObstacleKind::Backboard(rect) | ObstacleKind::Free(rect) => {
                if rect.overlaps_circle(body.pos, radius) {
                    candidates.push(Candidate::Solid(i));
                }
            }
            ObstacleKind::Net(net) => {
                if !body.net_guarded(now, net.tuning.guard_ticks)
                    && net.bounds().overlaps_circle(body.pos, radius)
                {
                    candidates.push(Candidate::Solid(i));
                }
            }
            ObstacleKind::Wall(_) => {}
        }
    }

    for (i, paddle) in paddles.iter().enumerate() {
        if paddle_overlaps(body, paddle) {
            candidates.push(Candidate::Paddle(i));
        }
    }

    candidates.sort_by_key(|c| c.priority());

    let mut events = Vec::new();
    for candidate in candidates {
        let response = match candidate {
            Candidate::Goal(i) => Some(goal_event(body, obstacles[i].id)),
            Candidate::Solid(i) => {
                let obstacle = &obstacles[i];
                match &obstacle.kind {
                    ObstacleKind::Basket(basket) => bounce_off_rim(body, basket)
                        .map(|(n, speed)| event(body, ContactTarget::Obstacle(obstacle.id), n, speed, ContactKind::Bounce)),
                    ObstacleKind::Backboard(rect) | ObstacleKind::Free(rect) => {
                        bounce_off_rect(body, rect, &tuning.bounce).map(|(n, speed)| {
                            event(body, ContactTarget::Obstacle(obstacle.id), n, speed, ContactKind::Bounce)
                        })
                    }
                    ObstacleKind::Net(net) => bounce_off_net(body, net, now, rng).map(|(n, speed)| {
                        event(body, ContactTarget::Obstacle(obstacle.id), n, speed, ContactKind::NetTouch)
                    }),
                    ObstacleKind::Wall(_) => None,
                }
            }
            Candidate::Paddle(i) => hit_paddle(body, &mut paddles[i], &tuning.paddle.style, rng),
        };

        if let Some(contact) = response {
            events.push(contact);
            break;
        }
    }

    for obstacle in obstacles {
        if let ObstacleKind::Wall(wall) = &obstacle.kind {
            if let Some((normal, speed)) = confine(body, wall) {
                if speed >= MIN_EVENT_SPEED {
                    events.push(event(body, ContactTarget::Wall(wall.side), normal, speed, ContactKind::Bounce));
                }
            }
        }
    }

    events
}

fn event(body: &Body, target: ContactTarget, normal: Vec2, impact_speed: f32, kind: ContactKind) -> ContactEvent {
    ContactEvent {
        body_id: body.id,
        target,
        normal,
        impact_speed,
        kind,
    }
}

fn goal_event(body: &Body, basket_id: u32) -> ContactEvent {
    event(body, ContactTarget::Obstacle(basket_id), Vec2::NEG_Y, body.speed(), ContactKind::Score)
}

fn paddle_overlaps(body: &Body, paddle: &Paddle) -> bool {
    let radius = body.radius();
    match paddle.body.shape {
        Shape::Circle { radius: r } => body.pos.distance(paddle.pos()) < radius + r,
        Shape::Box { half } => Aabb::new(paddle.pos(), half).overlaps_circle(body.pos, radius),
    }
}

/// Rim collar around the basket. Returns `(normal, impact_speed)` on a bounce.
pub fn bounce_off_rim(body: &mut Body, basket: &Basket) -> Option<(Vec2, f32)> {
    let t = &basket.tuning;
    let dx = body.pos.x - basket.center.x;
    let dy = body.pos.y - basket.center.y;

    // Falling in from above goes through to the scoring band
    if dy < -t.pass_through_dy && body.vel.y > 0.0 {
        return None;
    }

    let normal = if dy > 0.0 && body.vel.y < 0.0 {
        Vec2::Y
    } else if dx.abs() > t.side_dx {
        Vec2::new(dx.signum(), 0.0)
    } else {
        return None;
    };

    let impact = body.vel.dot(normal).abs();
    let push = t.push_min.max(body.vel.abs().max_element() + 1.0);
    if normal.y != 0.0 {
        body.vel.y = body.vel.y.abs() * t.damping;
    } else {
        body.vel.x = normal.x * body.vel.x.abs() * t.damping;
    }
    body.pos += normal * push;
    body.vel = snap_to_rest(body.vel, t.rest_threshold);
    Some((normal, impact))
}

/// Bounce off an axis-aligned rectangle along the axis of least overlap.
///
/// Returns `(normal, impact_speed)` when the body overlaps the rectangle.
pub fn bounce_off_rect(body: &mut Body, rect: &Aabb, bounce: &BounceTuning) -> Option<(Vec2, f32)> {
    let r = body.radius();
    let (min, max) = (rect.min(), rect.max());
    let overlaps = [
        (body.pos.x + r - min.x, Vec2::NEG_X),
        (max.x - (body.pos.x - r), Vec2::X),
        (body.pos.y + r - min.y, Vec2::NEG_Y),
        (max.y - (body.pos.y - r), Vec2::Y),
    ];
    if overlaps.iter().any(|(depth, _)| *depth <= 0.0) {
        return None;
    }
    let (depth, normal) = overlaps
        .iter()
        .copied()
        .fold((f32::INFINITY, Vec2::NEG_Y), |best, cur| if cur.0 < best.0 { cur } else { best });

    let impact = body.vel.dot(normal).abs();
    let push = bounce.push_min.max(body.speed() + 1.0);
    if normal.x != 0.0 {
        body.vel.x = normal.x * body.vel.x.abs() * bounce.damping;
    } else {
        body.vel.y = normal.y * body.vel.y.abs() * bounce.damping;
    }
    body.pos += normal * depth.max(push);

    body.vel = snap_to_rest(body.vel, bounce.rest_threshold);
    body.vel = Vec2::new(
        min_rebound(body.vel.x, bounce.min_rebound),
        min_rebound(body.vel.y, bounce.min_rebound),
    );
    Some((normal, impact))
}

fn min_rebound(v: f32, floor: f32) -> f32 {
    if v != 0.0 && v.abs() < floor {
        floor.copysign(v)
    } else {
        v
    }
}

/// Net top band and poles
fn bounce_off_net(body: &mut Body, net: &Net, now: u64, rng: &mut Pcg32) -> Option<(Vec2, f32)> {
    let t = &net.tuning;
    let r = body.radius();
    if !net.bounds().overlaps_circle(body.pos, r) {
        return None;
    }

    let left = net.center_x - t.half_width;
    let right = net.center_x + t.half_width;

    let (normal, impact) = if body.pos.y < t.top_y + t.top_thickness {
        let impact = body.vel.y.abs();
        body.vel.y = -body.vel.y.abs() * t.top_damping;
        body.pos.y = t.top_y - r - t.top_clearance;
        if body.vel.x.abs() < 1.0 {
            body.vel.x += if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        }
        (Vec2::NEG_Y, impact)
    } else {
        let on_left = body.pos.x < left + t.pole_thickness;
        let nx = if on_left { -1.0 } else { 1.0 };
        let impact = body.vel.x.abs();
        body.vel.x = nx * body.vel.x.abs() * t.damping;
        body.pos.x = if on_left {
            left - r - t.clearance
        } else {
            right + r + t.clearance
        };
        (Vec2::new(nx, 0.0), impact)
    };

    body.last_net_tick = Some(now);
    Some((normal, impact))
}

/// Keep the projectile center inside a court wall
pub fn confine(body: &mut Body, wall: &Wall) -> Option<(Vec2, f32)> {
    if wall.penetration(body.pos) <= 0.0 {
        return None;
    }
    let n = wall.side.normal();
    let vn = body.vel.dot(n);
    let impact = (-vn).max(0.0);
    let tangent = body.vel - n * vn;
    let response = &wall.response;

    match wall.side {
        WallSide::Ceiling | WallSide::Floor => body.pos.y = wall.coord,
        WallSide::Left | WallSide::Right => body.pos.x = wall.coord,
    }

    let normal_speed = match response.mode {
        WallMode::Reflect => vn.abs() * response.damping,
        WallMode::Absorb => vn.max(0.0),
        WallMode::Stop => {
            body.vel = Vec2::ZERO;
            return Some((n, impact));
        }
    };
    let mut tangent = tangent * response.tangent_damping;
    let mut normal_speed = normal_speed;

    match response.rest {
        RestRule::None => {}
        RestRule::NormalBelow(threshold) => {
            if normal_speed < threshold {
                normal_speed = 0.0;
            }
        }
        RestRule::BothBelow(threshold) => {
            if normal_speed < threshold && tangent.length() < threshold {
                normal_speed = 0.0;
                tangent = Vec2::ZERO;
            }
        }
    }

    body.vel = tangent + n * normal_speed;
    Some((n, impact))
}

fn hit_paddle(body: &mut Body, paddle: &mut Paddle, style: &HitStyle, rng: &mut Pcg32) -> Option<ContactEvent> {
    let active = paddle.is_active(style);
    match style {
        HitStyle::Hand(hand) => Some(hand_block(body, paddle, hand, active)),
        HitStyle::Racket(racket) => Some(racket_hit(body, paddle, racket, active)),
        HitStyle::Volley(volley) => Some(volley_hit(body, paddle, volley, rng)),
    }
}

fn hand_block(body: &mut Body, paddle: &mut Paddle, hand: &HandStyle, airborne: bool) -> ContactEvent {
    let hand_radius = paddle.body.radius();
    let n = safe_normalize(body.pos - paddle.pos(), Vec2::NEG_Y);
    let impact = (body.vel - paddle.body.vel).dot(n).abs();

    body.pos = paddle.pos() + n * (body.radius() + hand_radius);
    body.vel -= 2.0 * body.vel.dot(n) * n;
    body.vel *= hand.damping;
    body.vel += paddle.body.vel * hand.transfer;

    if airborne {
        body.vel += Vec2::new(n.x * hand.swat_power, -hand.swat_lift * n.y * hand.swat_power);
        paddle.body.pos -= n * hand.recoil;
    }
    body.vel = snap_to_rest(body.vel, hand.rest_threshold);

    event(body, ContactTarget::Paddle(paddle.side), n, impact, ContactKind::Block)
}

fn racket_hit(body: &mut Body, paddle: &Paddle, racket: &RacketStyle, swinging: bool) -> ContactEvent {
    let rel = body.pos - paddle.pos();
    let toward = paddle.side.toward_opponent();
    let impact = body.speed();

    let kind = if swinging {
        let angle = rel.y.atan2(rel.x);
        let speed = racket.smash_speed;
        let (boost, vy, kind) = if rel.y < -racket.smash_band {
            let boost = racket.smash_down_boost;
            (boost, (speed * boost * racket.smash_down_vmod).abs(), ContactKind::Smash)
        } else if rel.y > racket.smash_band {
            let boost = racket.lift_boost;
            (boost, -(speed * boost * racket.lift_vmod).abs(), ContactKind::Hit)
        } else {
            let boost = racket.flat_boost;
            (boost, angle.sin() * speed * boost - racket.flat_lift, ContactKind::Hit)
        };
        let vx = (angle.cos() * speed * boost * racket.distance_multiplier).abs() * toward;
        body.vel = Vec2::new(vx, vy);
        body.pos.x += racket.smash_nudge * toward;
        body.pos.y += racket.smash_nudge * if vy < 0.0 { -1.0 } else { 1.0 };
        kind
    } else {
        let vy = if rel.y < -racket.idle_band {
            -racket.idle_lift_top
        } else if rel.y > racket.idle_band {
            -racket.idle_lift_bottom
        } else {
            -racket.idle_lift_mid
        };
        body.vel = Vec2::new(racket.idle_speed * toward, vy);
        body.pos += Vec2::new(racket.idle_nudge.x * toward, -racket.idle_nudge.y);
        ContactKind::Hit
    };

    let normal = safe_normalize(body.vel, Vec2::NEG_Y);
    event(body, ContactTarget::Paddle(paddle.side), normal, impact, kind)
}

fn volley_hit(body: &mut Body, paddle: &Paddle, volley: &VolleyStyle, rng: &mut Pcg32) -> ContactEvent {
    let rel = body.pos - paddle.pos();
    let above = paddle.pos().y - body.pos.y;
    let impact = body.speed();

    let kind = if above > 0.0 && above < volley.spike_height && rel.x.abs() < volley.spike_reach {
        let jitter = if volley.spike_jitter > 0 {
            rng.random_range(0..volley.spike_jitter) as f32
        } else {
            0.0
        };
        let speed = volley.spike_speed + jitter;
        let degrees = match paddle.side {
            Side::Left => -volley.spike_angle_deg,
            Side::Right => -(180.0 - volley.spike_angle_deg),
        };
        body.vel = Vec2::from_angle(degrees * PI / 180.0) * speed;
        ContactKind::Smash
    } else {
        let speed = (body.speed() + volley.hit_bonus).min(volley.hit_cap);
        let angle = rel.y.atan2(rel.x) - volley.angle_bias;
        let dir = Vec2::from_angle(angle);
        body.vel = Vec2::new((dir.x * speed).abs() * paddle.side.toward_opponent(), dir.y * speed);
        ContactKind::Hit
    };

    let normal = safe_normalize(body.vel, Vec2::NEG_Y);
    body.pos += normal * volley.nudge;
    event(body, ContactTarget::Paddle(paddle.side), normal, impact, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::court_walls;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rect() -> Aabb {
        Aabb::new(Vec2::new(500.0, 300.0), Vec2::new(20.0, 42.5))
    }

    fn walls(tuning: &SportTuning) -> Vec<Obstacle> {
        court_walls(&tuning.court)
            .into_iter()
            .enumerate()
            .map(|(i, w)| Obstacle {
                id: i as u32 + 1,
                kind: ObstacleKind::Wall(w),
            })
            .collect()
    }

    #[test]
    fn test_rect_bounce_reflects_least_overlap_axis() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        // Coming in from the left edge
        let mut body = Body::projectile(1, Vec2::new(462.0, 300.0), Vec2::new(6.0, 1.0), 21.0);
        let (n, impact) = bounce_off_rect(&mut body, &rect(), &tuning.bounce).unwrap();
        assert_eq!(n, Vec2::NEG_X);
        assert_eq!(impact, 6.0);
        assert!((body.vel.x - -4.2).abs() < 1e-5);
        // Vertical component below the rebound floor is raised to it
        assert_eq!(body.vel.y, 2.0);
        assert!(body.pos.x + 21.0 <= 480.0);
    }

    #[test]
    fn test_rect_bounce_snaps_to_rest() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let mut body = Body::projectile(1, Vec2::new(500.0, 240.0), Vec2::new(0.2, 0.4), 21.0);
        let (n, _) = bounce_off_rect(&mut body, &rect(), &tuning.bounce).unwrap();
        assert_eq!(n, Vec2::NEG_Y);
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_rim_passes_falling_ball_from_above() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let basket = Basket {
            center: Vec2::new(600.0, 300.0),
            tuning: tuning.basket.unwrap(),
        };
        let mut body = Body::projectile(1, Vec2::new(640.0, 270.0), Vec2::new(0.0, 5.0), 21.0);
        assert!(bounce_off_rim(&mut body, &basket).is_none());

        // From below while rising: knocked back down
        let mut body = Body::projectile(1, Vec2::new(600.0, 320.0), Vec2::new(1.0, -6.0), 21.0);
        let (n, _) = bounce_off_rim(&mut body, &basket).unwrap();
        assert_eq!(n, Vec2::Y);
        assert!(body.vel.y > 0.0);

        // Clipping the side of the collar
        let mut body = Body::projectile(1, Vec2::new(570.0, 295.0), Vec2::new(3.0, -1.0), 21.0);
        let (n, _) = bounce_off_rim(&mut body, &basket).unwrap();
        assert_eq!(n, Vec2::NEG_X);
        assert!(body.vel.x < 0.0);
    }

    #[test]
    fn test_net_top_band_and_guard() {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let net = Obstacle {
            id: 9,
            kind: ObstacleKind::Net(Net {
                center_x: 550.0,
                tuning: tuning.net.unwrap(),
            }),
        };
        let obstacles = vec![net];
        let mut rng = Pcg32::seed_from_u64(5);
        let top = tuning.net.unwrap().top_y;
        let mut body = Body::projectile(1, Vec2::new(550.0, top + 5.0), Vec2::new(0.0, 4.0), 17.5);

        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 10, &mut rng);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ContactKind::NetTouch);
        assert!(body.vel.y < 0.0);
        assert_eq!(body.vel.x.abs(), 1.0);
        assert_eq!(body.pos.y, top - 17.5 - 3.0);

        // Still guarded a few ticks later
        body.pos.y = top + 5.0;
        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 13, &mut rng);
        assert!(events.is_empty());
        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 15, &mut rng);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_net_pole_reflects_away() {
        let tuning = SportTuning::volleyball(1100.0, 600.0);
        let net = Net {
            center_x: 550.0,
            tuning: tuning.net.unwrap(),
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut body = Body::projectile(1, Vec2::new(525.0, 450.0), Vec2::new(8.0, 0.0), 30.0);
        let (n, impact) = bounce_off_net(&mut body, &net, 1, &mut rng).unwrap();
        assert_eq!(n, Vec2::NEG_X);
        assert_eq!(impact, 8.0);
        assert!(body.vel.x < 0.0);
        assert_eq!(body.pos.x, 540.0 - 30.0 - 2.0);
    }

    #[test]
    fn test_hand_block_separates_and_damps() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let mut hand = Paddle::new(2, Side::Right, Vec2::new(400.0, 400.0), tuning.paddle.shape);
        hand.on_ground = true;
        let mut body = Body::projectile(1, Vec2::new(400.0, 370.0), Vec2::new(0.0, 10.0), 21.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let event = hit_paddle(&mut body, &mut hand, &tuning.paddle.style, &mut rng).unwrap();
        assert_eq!(event.kind, ContactKind::Block);
        assert_eq!(body.pos, Vec2::new(400.0, 365.0));
        assert!((body.vel.y - -7.0).abs() < 1e-5);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_airborne_hand_swats_down_and_recoils() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let mut hand = Paddle::new(2, Side::Right, Vec2::new(400.0, 400.0), tuning.paddle.shape);
        hand.on_ground = false;
        let mut body = Body::projectile(1, Vec2::new(400.0, 370.0), Vec2::new(0.0, 10.0), 21.0);
        let mut rng = Pcg32::seed_from_u64(1);
        hit_paddle(&mut body, &mut hand, &tuning.paddle.style, &mut rng);
        // -7 from the bounce, +12 from the swat
        assert!((body.vel.y - 5.0).abs() < 1e-5);
        assert_eq!(hand.pos(), Vec2::new(400.0, 402.0));
    }

    #[test]
    fn test_racket_smash_goes_down_toward_opponent() {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let mut racket = Paddle::new(2, Side::Left, Vec2::new(300.0, 400.0), tuning.paddle.shape);
        racket.swing_ticks = 10;
        let mut body = Body::projectile(1, Vec2::new(320.0, 345.0), Vec2::new(-3.0, 4.0), 17.5);
        let mut rng = Pcg32::seed_from_u64(1);
        let event = hit_paddle(&mut body, &mut racket, &tuning.paddle.style, &mut rng).unwrap();
        assert_eq!(event.kind, ContactKind::Smash);
        assert!(body.vel.x > 0.0);
        assert!((body.vel.y - 32.4).abs() < 1e-4);
    }

    #[test]
    fn test_idle_racket_pops_shuttle_over() {
        let tuning = SportTuning::badminton(1100.0, 600.0);
        let mut racket = Paddle::new(2, Side::Right, Vec2::new(800.0, 400.0), tuning.paddle.shape);
        let mut body = Body::projectile(1, Vec2::new(780.0, 400.0), Vec2::new(5.0, 2.0), 17.5);
        let mut rng = Pcg32::seed_from_u64(1);
        let event = hit_paddle(&mut body, &mut racket, &tuning.paddle.style, &mut rng).unwrap();
        assert_eq!(event.kind, ContactKind::Hit);
        assert_eq!(body.vel, Vec2::new(-10.0, -8.0));
        assert_eq!(body.pos, Vec2::new(765.0, 390.0));
    }

    #[test]
    fn test_volley_spike_angle() {
        let tuning = SportTuning::volleyball(1100.0, 600.0);
        let mut player = Paddle::new(2, Side::Right, Vec2::new(800.0, 500.0), tuning.paddle.shape);
        let mut body = Body::projectile(1, Vec2::new(810.0, 445.0), Vec2::new(0.0, 3.0), 30.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let event = hit_paddle(&mut body, &mut player, &tuning.paddle.style, &mut rng).unwrap();
        assert_eq!(event.kind, ContactKind::Smash);
        let speed = body.speed();
        assert!(speed > 24.99 && speed < 35.01);
        assert!(body.vel.x < 0.0 && body.vel.y < 0.0);
        let degrees = body.vel.y.atan2(body.vel.x).to_degrees();
        assert!((degrees - -120.0).abs() < 1e-3);
    }

    #[test]
    fn test_volley_regular_hit_heads_to_opponent() {
        let tuning = SportTuning::volleyball(1100.0, 600.0);
        let mut player = Paddle::new(2, Side::Left, Vec2::new(300.0, 500.0), tuning.paddle.shape);
        let mut body = Body::projectile(1, Vec2::new(250.0, 520.0), Vec2::new(2.0, 6.0), 30.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let event = hit_paddle(&mut body, &mut player, &tuning.paddle.style, &mut rng).unwrap();
        assert_eq!(event.kind, ContactKind::Hit);
        assert!(body.vel.x > 0.0);
        assert!(body.speed() <= 20.0 + 1e-4);
    }

    #[test]
    fn test_goal_outranks_rim() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let basket = Basket {
            center: Vec2::new(600.0, 300.0),
            tuning: tuning.basket.unwrap(),
        };
        let obstacles = vec![Obstacle {
            id: 4,
            kind: ObstacleKind::Basket(basket),
        }];
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = Body::projectile(1, Vec2::new(620.0, 310.0), Vec2::new(-1.0, 4.0), 21.0);
        body.prev_pos = Vec2::new(621.0, 302.0);

        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 1, &mut rng);
        assert_eq!(events[0].kind, ContactKind::Score);

        // Disarmed: the same contact is only a collar bounce
        let mut body = Body::projectile(1, Vec2::new(620.0, 310.0), Vec2::new(-1.0, 4.0), 21.0);
        body.prev_pos = Vec2::new(621.0, 302.0);
        let events = resolve(&mut body, &obstacles, &mut [], &tuning, false, 1, &mut rng);
        assert!(events.iter().all(|e| e.kind != ContactKind::Score));
    }

    #[test]
    fn test_walls_confine_and_report() {
        let tuning = SportTuning::volleyball(1100.0, 600.0);
        let obstacles = walls(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = Body::projectile(1, Vec2::new(-5.0, 300.0), Vec2::new(-6.0, 0.0), 30.0);
        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 1, &mut rng);
        assert_eq!(body.pos.x, 0.0);
        assert!((body.vel.x - 4.2).abs() < 1e-5);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, ContactTarget::Wall(WallSide::Left));

        // Volleyball ceiling absorbs upward motion
        let mut body = Body::projectile(1, Vec2::new(300.0, 70.0), Vec2::new(3.0, -9.0), 30.0);
        resolve(&mut body, &obstacles, &mut [], &tuning, true, 1, &mut rng);
        assert_eq!(body.pos.y, 80.0);
        assert_eq!(body.vel, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_slow_floor_contact_is_silent_and_rests() {
        let tuning = SportTuning::basketball(1100.0, 600.0);
        let obstacles = walls(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        let floor = tuning.court.floor_y;
        let mut body = Body::projectile(1, Vec2::new(300.0, floor + 1.0), Vec2::new(0.5, 0.6), 21.0);
        let events = resolve(&mut body, &obstacles, &mut [], &tuning, true, 1, &mut rng);
        assert!(events.is_empty());
        assert_eq!(body.vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_rect_bounce_is_damped_with_rebound_floor(
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            ox in -25.0f32..25.0,
            oy in -55.0f32..55.0,
        ) {
            let tuning = SportTuning::basketball(1100.0, 600.0);
            let b = rect();
            let mut body = Body::projectile(1, b.center + Vec2::new(ox, oy), Vec2::new(vx, vy), 21.0);
            let before = body.vel;
            if let Some((n, _)) = bounce_off_rect(&mut body, &b, &tuning.bounce) {
                let vn_before = before.dot(n).abs();
                let vn_after = body.vel.dot(n);
                // Never heads back into the surface
                prop_assert!(vn_after >= 0.0);
                prop_assert!(vn_after <= (vn_before * 0.7).max(2.0) + 1e-4);
                for c in [body.vel.x, body.vel.y] {
                    prop_assert!(c == 0.0 || c.abs() >= 2.0 - 1e-6);
                }
            }
        }
    }
}
