//! Match settings
//!
//! Chosen once at game start (menu collaborator) and immutable for the match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Side;

/// Errors produced while building a match configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid court size {width}x{height} (minimum {min_width}x{min_height})")]
    InvalidCourt {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    #[error("unknown sport: {0}")]
    UnknownSport(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The three mini-games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    #[default]
    Badminton,
    Volleyball,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Basketball, Sport::Badminton, Sport::Volleyball];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Basketball => "basketball",
            Sport::Badminton => "badminton",
            Sport::Volleyball => "volleyball",
        }
    }

    pub fn from_name(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "basketball" | "basket" => Ok(Sport::Basketball),
            "badminton" => Ok(Sport::Badminton),
            "volleyball" | "volley" => Ok(Sport::Volleyball),
            _ => Err(ConfigError::UnknownSport(s.to_string())),
        }
    }
}

/// CPU difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Impossible => "impossible",
        }
    }

    pub fn from_name(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Everything needed to set up one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettings {
    pub sport: Sport,
    pub difficulty: Difficulty,
    pub court_width: f32,
    pub court_height: f32,
    /// Seed for every random decision in the match
    #[serde(default)]
    pub seed: u64,
    /// Sides driven by the AI controller
    #[serde(default = "default_cpu_sides")]
    pub cpu_sides: Vec<Side>,
}

fn default_cpu_sides() -> Vec<Side> {
    vec![Side::Right]
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            sport: Sport::default(),
            difficulty: Difficulty::default(),
            court_width: DEFAULT_COURT_WIDTH,
            court_height: DEFAULT_COURT_HEIGHT,
            seed: 0,
            cpu_sides: default_cpu_sides(),
        }
    }
}

impl MatchSettings {
    pub fn new(sport: Sport, difficulty: Difficulty, court_width: f32, court_height: f32) -> Self {
        Self {
            sport,
            difficulty,
            court_width,
            court_height,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_cpu_sides(mut self, sides: &[Side]) -> Self {
        self.cpu_sides = sides.to_vec();
        self
    }

    /// Whether the AI drives the given side
    pub fn is_cpu(&self, side: Side) -> bool {
        self.cpu_sides.contains(&side)
    }

    /// Reject court sizes the layouts cannot fit in
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = self.court_width;
        let h = self.court_height;
        if !w.is_finite() || !h.is_finite() || w < MIN_COURT_WIDTH || h < MIN_COURT_HEIGHT {
            return Err(ConfigError::InvalidCourt {
                width: w,
                height: h,
                min_width: MIN_COURT_WIDTH,
                min_height: MIN_COURT_HEIGHT,
            });
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: MatchSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = MatchSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.is_cpu(Side::Right));
        assert!(!settings.is_cpu(Side::Left));
    }

    #[test]
    fn test_rejects_small_or_non_finite_court() {
        let small = MatchSettings::new(Sport::Badminton, Difficulty::Easy, 100.0, 600.0);
        assert!(matches!(
            small.validate(),
            Err(ConfigError::InvalidCourt { .. })
        ));
        let nan = MatchSettings::new(Sport::Badminton, Difficulty::Easy, f32::NAN, 600.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_names_parse() {
        assert_eq!(Sport::from_name("Volleyball").unwrap(), Sport::Volleyball);
        assert_eq!(Difficulty::from_name("med").unwrap(), Difficulty::Medium);
        assert!(matches!(
            Difficulty::from_name("nightmare"),
            Err(ConfigError::UnknownDifficulty(_))
        ));
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(d.as_str()).unwrap(), d);
        }
    }

    #[test]
    fn test_json_settings() {
        let json = r#"{"sport":"volleyball","difficulty":"hard","court_width":1100,"court_height":600}"#;
        let settings = MatchSettings::from_json(json).unwrap();
        assert_eq!(settings.sport, Sport::Volleyball);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.cpu_sides, vec![Side::Right]);

        assert!(matches!(
            MatchSettings::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        let too_small = r#"{"sport":"badminton","difficulty":"easy","court_width":10,"court_height":10}"#;
        assert!(MatchSettings::from_json(too_small).is_err());
    }
}
