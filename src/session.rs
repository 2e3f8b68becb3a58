//! Embedding surface
//!
//! A `Session` owns one match plus its optional collaborators (score listener,
//! audio). Hosts call `tick` once per frame with decoded intents.

use crate::audio::AudioManager;
use crate::settings::{ConfigError, Difficulty, MatchSettings, Sport};
use crate::sim::{self, ContactEvent, GameState, MatchEvent, RoundState, ScoreUpdate, TickInput};
use crate::tuning::SportTuning;

type ScoreListener = Box<dyn FnMut(ScoreUpdate)>;

pub struct Session {
    state: GameState,
    audio: Option<AudioManager>,
    on_score: Option<ScoreListener>,
}

impl Session {
    /// Validate settings and build the match
    pub fn configure(settings: MatchSettings) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::new(settings)?))
    }

    pub fn configure_with(
        difficulty: Difficulty,
        sport: Sport,
        court_width: f32,
        court_height: f32,
    ) -> Result<Self, ConfigError> {
        Self::configure(MatchSettings::new(sport, difficulty, court_width, court_height))
    }

    /// Build the match with custom tuning
    pub fn configure_tuned(settings: MatchSettings, tuning: SportTuning) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::with_tuning(settings, tuning)?))
    }

    fn from_state(state: GameState) -> Self {
        Self {
            state,
            audio: None,
            on_score: None,
        }
    }

    /// Register the score listener (replaces any previous one)
    pub fn on_score(&mut self, callback: impl FnMut(ScoreUpdate) + 'static) {
        self.on_score = Some(Box::new(callback));
    }

    pub fn attach_audio(&mut self, audio: AudioManager) {
        self.audio = Some(audio);
    }

    pub fn audio_mut(&mut self) -> Option<&mut AudioManager> {
        self.audio.as_mut()
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) -> Vec<ContactEvent> {
        let contacts = sim::tick(&mut self.state, input);
        let events = self.state.drain_events();

        if let Some(callback) = self.on_score.as_mut() {
            for event in &events {
                if let MatchEvent::PointScored(update) = event {
                    callback(*update);
                }
            }
        }

        if let Some(audio) = self.audio.as_mut() {
            let sport = self.state.sport();
            audio.on_contacts(sport, &contacts, &self.state.obstacles);
            let time_expired = self.state.time_left == Some(0);
            audio.on_match_events(sport, &events, time_expired);
        }

        contacts
    }

    /// Restart the match with the same settings and tuning
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let settings = self.state.settings.clone();
        let tuning = self.state.tuning.clone();
        self.state = GameState::with_tuning(settings, tuning)?;
        log::info!("Match reset");
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn round(&self) -> RoundState {
        self.state.round
    }

    /// `(left, right)`
    pub fn scores(&self) -> (u32, u32) {
        (self.state.scores[0], self.state.scores[1])
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_configure_rejects_bad_court() {
        assert!(Session::configure_with(Difficulty::Easy, Sport::Basketball, 0.0, 0.0).is_err());
        assert!(Session::configure_with(Difficulty::Easy, Sport::Basketball, 1100.0, 600.0).is_ok());
    }

    #[test]
    fn test_score_listener_and_reset() {
        let settings = MatchSettings::new(Sport::Badminton, Difficulty::Impossible, 1100.0, 600.0)
            .with_seed(3)
            .with_cpu_sides(&Side::BOTH);
        let mut session = Session::configure(settings).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.on_score(move |update| sink.borrow_mut().push(update));

        for _ in 0..20_000 {
            session.tick(&TickInput::default());
            if !seen.borrow().is_empty() {
                break;
            }
        }
        let updates = seen.borrow();
        assert!(!updates.is_empty());
        let first = updates[0];
        assert_eq!(first.left + first.right, 1);
        assert_eq!((first.left, first.right), session.scores());
        drop(updates);

        session.reset().unwrap();
        assert_eq!(session.scores(), (0, 0));
        assert_eq!(session.round(), RoundState::Serving);
    }
}
