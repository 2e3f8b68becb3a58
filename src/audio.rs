//! Audio capability
//!
//! The simulation never plays sounds itself. `AudioManager` turns contact and
//! match events into sound effects and hands them to a pluggable backend.
//! A backend failure disables that manager only; the match keeps running.

use thiserror::Error;

use crate::settings::Sport;
use crate::sim::{
    ContactEvent, ContactKind, ContactTarget, MatchEvent, Obstacle, ObstacleKind, WallSide,
};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Basketball blocked by the hand
    Smack,
    /// Ball off the floor, walls or an obstacle
    Bounce,
    /// Basketball off the backboard
    Backboard,
    /// Basketball off the rim collar
    Rim,
    /// Racket return
    RacketHit,
    /// Racket smash
    RacketSmash,
    /// Regular volleyball hit
    VolleyHit,
    /// Volleyball spike
    VolleySmash,
    /// Projectile off the net
    Net,
    /// Point scored
    Whistle,
    /// Match won
    FinalWhistle,
    /// Timed match expired
    TimeEnd,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("failed to play {effect:?}: {reason}")]
    Playback { effect: SoundEffect, reason: String },
}

/// Something that can actually make noise
pub trait SoundBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Backend that plays nothing (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullBackend;

impl SoundBackend for NullBackend {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Audio manager for one session
pub struct AudioManager {
    backend: Box<dyn SoundBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    disabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullBackend))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            disabled: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if self.disabled || vol <= 0.0 {
            return;
        }
        if let Err(e) = self.backend.play(effect, vol) {
            log::warn!("{e} - audio disabled for this session");
            self.disabled = true;
        }
    }

    /// Sounds for the contacts of one tick
    pub fn on_contacts(&mut self, sport: Sport, contacts: &[ContactEvent], obstacles: &[Obstacle]) {
        for contact in contacts {
            if let Some(effect) = contact_sound(sport, contact, obstacles) {
                self.play(effect);
            }
        }
    }

    /// Sounds for match-level events
    pub fn on_match_events(&mut self, sport: Sport, events: &[MatchEvent], time_expired: bool) {
        for event in events {
            let effect = match event {
                MatchEvent::Serve { .. } => None,
                MatchEvent::PointScored(_) => (sport != Sport::Basketball).then_some(SoundEffect::Whistle),
                MatchEvent::MatchOver { .. } if time_expired => Some(SoundEffect::TimeEnd),
                MatchEvent::MatchOver { .. } => Some(SoundEffect::FinalWhistle),
            };
            if let Some(effect) = effect {
                self.play(effect);
            }
        }
    }
}

/// Effect for a single contact, if the sport makes one
pub fn contact_sound(sport: Sport, contact: &ContactEvent, obstacles: &[Obstacle]) -> Option<SoundEffect> {
    match contact.kind {
        ContactKind::Score => Some(SoundEffect::Rim),
        ContactKind::Block => Some(SoundEffect::Smack),
        ContactKind::NetTouch => Some(SoundEffect::Net),
        ContactKind::Hit | ContactKind::Smash => {
            let smash = contact.kind == ContactKind::Smash;
            match (sport, smash) {
                (Sport::Badminton, false) => Some(SoundEffect::RacketHit),
                (Sport::Badminton, true) => Some(SoundEffect::RacketSmash),
                (Sport::Volleyball, false) => Some(SoundEffect::VolleyHit),
                (Sport::Volleyball, true) => Some(SoundEffect::VolleySmash),
                (Sport::Basketball, _) => Some(SoundEffect::Smack),
            }
        }
        ContactKind::Bounce => match contact.target {
            ContactTarget::Obstacle(id) => {
                let kind = obstacles.iter().find(|o| o.id == id).map(|o| &o.kind);
                match kind {
                    Some(ObstacleKind::Backboard(_)) => Some(SoundEffect::Backboard),
                    Some(ObstacleKind::Basket(_)) => Some(SoundEffect::Rim),
                    _ => Some(SoundEffect::Bounce),
                }
            }
            // Shuttlecocks land silently
            ContactTarget::Wall(WallSide::Floor) if sport == Sport::Badminton => None,
            ContactTarget::Wall(_) | ContactTarget::Paddle(_) => Some(SoundEffect::Bounce),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        played: Rc<RefCell<Vec<SoundEffect>>>,
        fail: bool,
    }

    impl SoundBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Unavailable("no device".into()));
            }
            self.played.borrow_mut().push(effect);
            Ok(())
        }
    }

    fn contact(kind: ContactKind, target: ContactTarget) -> ContactEvent {
        ContactEvent {
            body_id: 1,
            target,
            normal: Vec2::NEG_Y,
            impact_speed: 5.0,
            kind,
        }
    }

    #[test]
    fn test_sport_specific_sounds() {
        let smash = contact(ContactKind::Smash, ContactTarget::Paddle(crate::sim::Side::Left));
        assert_eq!(contact_sound(Sport::Badminton, &smash, &[]), Some(SoundEffect::RacketSmash));
        assert_eq!(contact_sound(Sport::Volleyball, &smash, &[]), Some(SoundEffect::VolleySmash));
        let floor = contact(ContactKind::Bounce, ContactTarget::Wall(WallSide::Floor));
        assert_eq!(contact_sound(Sport::Badminton, &floor, &[]), None);
        assert_eq!(contact_sound(Sport::Basketball, &floor, &[]), Some(SoundEffect::Bounce));
    }

    #[test]
    fn test_mute_plays_nothing() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(Box::new(Recorder {
            played: played.clone(),
            fail: false,
        }));
        audio.play(SoundEffect::Net);
        audio.set_muted(true);
        audio.play(SoundEffect::Net);
        assert_eq!(played.borrow().len(), 1);
    }

    #[test]
    fn test_failure_disables_manager() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(Box::new(Recorder {
            played: played.clone(),
            fail: true,
        }));
        audio.play(SoundEffect::Whistle);
        assert!(audio.is_disabled());
        audio.on_match_events(
            Sport::Volleyball,
            &[MatchEvent::MatchOver { winner: None }],
            false,
        );
        assert!(played.borrow().is_empty());
    }
}
