//! Court Sports headless runner
//!
//! Plays one CPU match for a sport and difficulty and logs the result.
//! Basketball has no CPU shooter, so the left side takes scripted shots.

use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use court_sports::audio::AudioManager;
use court_sports::consts::TICK_RATE;
use court_sports::sim::ai::launch_velocity;
use court_sports::sim::{Intents, MAX_SHOT_DRAG, Side, TickInput};
use court_sports::{ConfigError, Difficulty, MatchSettings, Session, Sport};

#[derive(Parser, Debug)]
#[command(name = "court-sports")]
#[command(about = "Play a headless CPU match and log the result", long_about = None)]
struct Cli {
    /// basketball, badminton or volleyball
    #[arg(default_value = "badminton", value_parser = Sport::from_name)]
    sport: Sport,

    /// easy, medium, hard, expert or impossible
    #[arg(default_value = "medium", value_parser = Difficulty::from_name)]
    difficulty: Difficulty,

    /// Stop after this many ticks even if the match is still running
    #[arg(long, default_value_t = 60 * 60 * TICK_RATE as u64)]
    max_ticks: u64,

    /// Match seed
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,
}

impl Cli {
    fn settings(&self) -> MatchSettings {
        let cpu_sides: &[Side] = match self.sport {
            Sport::Basketball => &[Side::Right],
            _ => &Side::BOTH,
        };
        MatchSettings {
            sport: self.sport,
            difficulty: self.difficulty,
            seed: self.seed,
            cpu_sides: cpu_sides.to_vec(),
            ..MatchSettings::default()
        }
    }
}

/// Scripted basketball shooter: once the ball settles, throw it at the basket
fn scripted_shot(session: &Session, rng: &mut Pcg32) -> Option<Vec2> {
    let state = session.state();
    let ball = state.projectile.as_ref()?;
    let hoop = state.basket()?.center;
    if ball.speed() > 0.5 {
        return None;
    }
    let flight_ticks = rng.random_range(35.0..55.0);
    let target = hoop + Vec2::new(rng.random_range(-15.0..15.0), 0.0);
    let vel = launch_velocity(target - ball.pos, state.tuning.kinematics.gravity, flight_ticks);
    // The ball flies opposite the drag at a tenth of its length
    let drag = (-vel * 10.0).clamp_length_max(MAX_SHOT_DRAG);
    Some(drag)
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let settings = cli.settings();
    let max_ticks = cli.max_ticks;
    let sport = settings.sport;
    let mut shooter_rng = Pcg32::seed_from_u64(settings.seed ^ 0x5EED);

    let mut session = Session::configure(settings)?;
    session.attach_audio(AudioManager::default());
    session.on_score(|update| {
        log::info!(
            "Score update: {} scored, {} - {}",
            update.side.as_str(),
            update.left,
            update.right
        );
    });

    let mut contacts = 0usize;
    let mut ticks = 0u64;
    while ticks < max_ticks && !session.is_over() {
        let mut input = TickInput::default();
        if sport == Sport::Basketball {
            input.left = Intents {
                shoot: scripted_shot(&session, &mut shooter_rng),
                ..Intents::default()
            };
        }
        contacts += session.tick(&input).len();
        ticks += 1;
    }

    let (left, right) = session.scores();
    log::info!(
        "{} finished after {} ticks ({:.1}s): {} - {}, {} contacts",
        sport.as_str(),
        ticks,
        ticks as f32 / TICK_RATE as f32,
        left,
        right,
        contacts
    );
    if !session.is_over() {
        log::warn!("Tick limit reached before the match ended");
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Court Sports (headless) starting...");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
